//! Bookkeeping for cancellable in-flight effects.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::effect::CancelId;

#[derive(Clone)]
struct RunningEffect {
    /// Set once the task is spawned.
    abort: Option<AbortHandle>,
    cancelled: Arc<AtomicBool>,
}

#[derive(Default)]
pub(crate) struct EffectRegistry {
    next_id: AtomicU64,
    running: Mutex<HashMap<CancelId, HashMap<u64, RunningEffect>>>,
}

impl EffectRegistry {
    pub(crate) fn next_task_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a task under `cancel_ids` before it is spawned, so a task
    /// that finishes immediately always deregisters after registering.
    pub(crate) fn register(&self, task_id: u64, cancel_ids: &[CancelId], cancelled: Arc<AtomicBool>) {
        let mut running = self.running.lock();
        let entry = RunningEffect {
            abort: None,
            cancelled,
        };
        for id in cancel_ids {
            running
                .entry(id.clone())
                .or_default()
                .insert(task_id, entry.clone());
        }
    }

    /// Record the abort handle of a spawned task that is still registered.
    pub(crate) fn attach(&self, task_id: u64, cancel_ids: &[CancelId], abort: &AbortHandle) {
        let mut running = self.running.lock();
        for id in cancel_ids {
            if let Some(effect) = running.get_mut(id).and_then(|tasks| tasks.get_mut(&task_id)) {
                effect.abort = Some(abort.clone());
            }
        }
    }

    /// Forget a task that completed (or was dropped) on its own.
    pub(crate) fn finished(&self, task_id: u64, cancel_ids: &[CancelId]) {
        let mut running = self.running.lock();
        for id in cancel_ids {
            if let Some(tasks) = running.get_mut(id) {
                tasks.remove(&task_id);
                if tasks.is_empty() {
                    running.remove(id);
                }
            }
        }
    }

    /// Cancel every task registered under `id`. Returns how many were torn
    /// down; cancelling an unknown id returns zero.
    pub(crate) fn cancel(&self, id: &CancelId) -> usize {
        let victims = {
            let mut running = self.running.lock();
            let Some(tasks) = running.remove(id) else {
                return 0;
            };
            // A task may be registered under several ids.
            let task_ids: HashSet<u64> = tasks.keys().copied().collect();
            running.retain(|_, other| {
                other.retain(|task_id, _| !task_ids.contains(task_id));
                !other.is_empty()
            });
            tasks
        };

        for effect in victims.values() {
            effect.cancelled.store(true, Ordering::SeqCst);
            if let Some(abort) = &effect.abort {
                abort.abort();
            }
        }
        victims.len()
    }

    pub(crate) fn in_flight(&self, id: &CancelId) -> usize {
        self.running.lock().get(id).map_or(0, HashMap::len)
    }
}
