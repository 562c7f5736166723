use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use parking_lot::Mutex;

use crate::effect::{BoxFuture, CancelId, Emitter, Task};

/// Wake flag for one effect. Set by timers and other wakers, cleared when
/// the executor polls the effect.
struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct EffectTask {
    id: u64,
    cancel_ids: Vec<CancelId>,
    future: BoxFuture,
    woken: Arc<WakeFlag>,
    cancelled: Arc<AtomicBool>,
}

/// An action waiting to be reduced, tagged with the effect that emitted it.
struct Emitted<A> {
    task: Option<u64>,
    action: A,
}

/// Single-threaded executor for test effects.
///
/// Nothing runs in the background: effects advance only when the owner calls
/// [`poll_woken`](Self::poll_woken), always in creation order.
pub(super) struct Executor<A> {
    tasks: Vec<EffectTask>,
    outbox: Arc<Mutex<VecDeque<Emitted<A>>>>,
    next_id: u64,
}

impl<A: Send + 'static> Executor<A> {
    pub(super) fn new() -> Self {
        Self {
            tasks: Vec::new(),
            outbox: Arc::new(Mutex::new(VecDeque::new())),
            next_id: 0,
        }
    }

    pub(super) fn spawn(&mut self, task: Task<A>) {
        let id = self.next_id;
        self.next_id += 1;
        let cancelled = Arc::new(AtomicBool::new(false));

        let emitter = {
            let outbox = Arc::clone(&self.outbox);
            let cancelled = Arc::clone(&cancelled);
            Emitter::new(move |action| {
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                outbox.lock().push_back(Emitted {
                    task: Some(id),
                    action,
                });
            })
        };
        let cancel_ids = task.cancel_ids.clone();
        tracing::trace!(task_id = id, cancel_ids = ?cancel_ids, "test effect started");
        self.tasks.push(EffectTask {
            id,
            cancel_ids,
            future: task.start(emitter),
            woken: Arc::new(WakeFlag(AtomicBool::new(true))),
            cancelled,
        });
    }

    /// Queue synchronous follow-up actions ahead of anything emitted so far.
    pub(super) fn send_now(&self, actions: Vec<A>) {
        let mut outbox = self.outbox.lock();
        for action in actions.into_iter().rev() {
            outbox.push_front(Emitted { task: None, action });
        }
    }

    pub(super) fn next_emitted(&self) -> Option<A> {
        self.outbox.lock().pop_front().map(|emitted| emitted.action)
    }

    /// Poll every woken effect once. Returns whether anything was polled.
    pub(super) fn poll_woken(&mut self) -> bool {
        let mut polled = false;
        let mut index = 0;
        while index < self.tasks.len() {
            let task = &mut self.tasks[index];
            if !task.woken.0.swap(false, Ordering::SeqCst) {
                index += 1;
                continue;
            }
            polled = true;
            let waker = Waker::from(Arc::clone(&task.woken));
            let mut cx = Context::from_waker(&waker);
            match task.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => {
                    tracing::trace!(task_id = task.id, "test effect finished");
                    self.tasks.remove(index);
                }
                Poll::Pending => index += 1,
            }
        }
        polled
    }

    /// Drop every effect registered under `id`, along with any actions they
    /// emitted that were not reduced yet. Returns how many were dropped.
    pub(super) fn cancel(&mut self, id: &CancelId) -> usize {
        self.remove_where(|task| task.cancel_ids.contains(id))
    }

    pub(super) fn cancel_all(&mut self) -> usize {
        self.remove_where(|_| true)
    }

    pub(super) fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    fn remove_where(&mut self, cancel: impl Fn(&EffectTask) -> bool) -> usize {
        let (removed, kept): (Vec<_>, Vec<_>) = self.tasks.drain(..).partition(|task| cancel(task));
        self.tasks = kept;
        if removed.is_empty() {
            return 0;
        }
        let ids: HashSet<u64> = removed.iter().map(|task| task.id).collect();
        for task in &removed {
            task.cancelled.store(true, Ordering::SeqCst);
        }
        self.outbox
            .lock()
            .retain(|emitted| emitted.task.map_or(true, |task| !ids.contains(&task)));
        // Dropping the futures releases their timers.
        removed.len()
    }
}
