//! Handles for the work started by a single `send`.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

#[derive(Default)]
struct SlotState {
    /// Actions belonging to this send that have not been reduced yet.
    pending: usize,
    handles: Vec<JoinHandle<()>>,
    cancelled: bool,
}

/// Shared between the pipeline and the [`StoreTask`] returned to the caller.
pub(crate) struct TaskSlot {
    state: Mutex<SlotState>,
    notify: Notify,
}

impl TaskSlot {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SlotState {
                pending: 1,
                ..SlotState::default()
            }),
            notify: Notify::new(),
        })
    }

    /// A follow-up action was queued on behalf of this send.
    pub(crate) fn enqueue(&self) {
        self.state.lock().pending += 1;
    }

    pub(crate) fn attach(&self, handle: JoinHandle<()>) {
        let mut state = self.state.lock();
        if state.cancelled {
            handle.abort();
        }
        state.handles.push(handle);
    }

    pub(crate) fn processed(&self) {
        let mut state = self.state.lock();
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            self.notify.notify_waiters();
        }
    }

    fn is_processed(&self) -> bool {
        self.state.lock().pending == 0
    }
}

/// Handle to the effects started by one [`Store::send`](crate::Store::send).
///
/// Dropping the handle does not cancel anything.
pub struct StoreTask {
    slot: Arc<TaskSlot>,
}

impl StoreTask {
    pub(crate) fn new(slot: Arc<TaskSlot>) -> Self {
        Self { slot }
    }

    /// Wait until the action has been reduced and every effect it started
    /// has completed or been cancelled.
    ///
    /// Actions emitted by those effects, and the effects they start in turn,
    /// belong to this send as well.
    pub async fn finish(self) {
        loop {
            self.processed().await;
            let handles = std::mem::take(&mut self.slot.state.lock().handles);
            if handles.is_empty() && self.slot.is_processed() {
                break;
            }
            for handle in handles {
                // Aborted tasks report a JoinError; that is an expected outcome.
                let _ = handle.await;
            }
        }
    }

    async fn processed(&self) {
        loop {
            // Subscribe before checking, otherwise a notify_waiters() between
            // the check and the await would be lost.
            let notified = self.slot.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.slot.is_processed() {
                return;
            }
            notified.await;
        }
    }

    /// Abort the effects started by this send.
    pub fn cancel(&self) {
        let mut state = self.slot.state.lock();
        state.cancelled = true;
        for handle in &state.handles {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot.state.lock().cancelled
    }
}
