use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::changes::StateChanges;
use super::registry::EffectRegistry;
use super::scoped::ScopedStore;
use super::task::{StoreTask, TaskSlot};
use crate::config::StoreSettings;
use crate::dependencies::Dependencies;
use crate::diff::diff;
use crate::effect::{CancelId, Emitter, Operation, Task};
use crate::error::StoreError;
use crate::mvi::Reducer;

struct Queued<A> {
    action: A,
    slot: Arc<TaskSlot>,
}

/// Single-writer action queue.
struct Pipeline<A> {
    queue: VecDeque<Queued<A>>,
    /// Some caller is currently reducing queued actions.
    draining: bool,
}

struct StoreInner<R: Reducer> {
    reducer: R,
    deps: Dependencies,
    settings: StoreSettings,
    state: watch::Sender<R::State>,
    pipeline: Mutex<Pipeline<R::Action>>,
    effects: EffectRegistry,
    runtime: Handle,
}

/// Runtime owning a feature's state.
///
/// Cloning a store yields another handle to the same state.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`Store`].
pub struct StoreBuilder<R: Reducer> {
    state: R::State,
    reducer: R,
    deps: Option<Dependencies>,
    settings: StoreSettings,
    runtime: Option<Handle>,
}

impl<R: Reducer> StoreBuilder<R> {
    /// Override dependencies, starting from [`Dependencies::live`].
    pub fn dependencies(mut self, configure: impl FnOnce(&mut Dependencies)) -> Self {
        let mut deps = self.deps.take().unwrap_or_else(Dependencies::live);
        configure(&mut deps);
        self.deps = Some(deps);
        self
    }

    pub fn settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Spawn effects on this runtime instead of the ambient one.
    pub fn handle(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// # Errors
    /// Returns [`StoreError::NoRuntime`] when no handle was given and the
    /// caller is not inside a tokio runtime.
    pub fn build(self) -> Result<Store<R>, StoreError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| StoreError::NoRuntime)?,
        };
        let (state, _) = watch::channel(self.state);
        Ok(Store {
            inner: Arc::new(StoreInner {
                reducer: self.reducer,
                deps: self.deps.unwrap_or_else(Dependencies::live),
                settings: self.settings,
                state,
                pipeline: Mutex::new(Pipeline {
                    queue: VecDeque::new(),
                    draining: false,
                }),
                effects: EffectRegistry::default(),
                runtime,
            }),
        })
    }
}

impl<R: Reducer> Store<R> {
    pub fn builder(initial_state: R::State, reducer: R) -> StoreBuilder<R> {
        StoreBuilder {
            state: initial_state,
            reducer,
            deps: None,
            settings: StoreSettings::default(),
            runtime: None,
        }
    }

    /// Store with live dependencies on the ambient tokio runtime.
    pub fn new(initial_state: R::State, reducer: R) -> Result<Self, StoreError> {
        Self::builder(initial_state, reducer).build()
    }

    /// Send an action into the pipeline.
    ///
    /// If no other caller is reducing, this call reduces the action (and any
    /// queued behind it) before returning. Otherwise the action is queued and
    /// the active caller picks it up, so reducer invocations never overlap.
    pub fn send(&self, action: R::Action) -> StoreTask {
        let slot = TaskSlot::new();
        self.dispatch(action, Arc::clone(&slot));
        StoreTask::new(slot)
    }

    fn dispatch(&self, action: R::Action, slot: Arc<TaskSlot>) {
        {
            let mut pipeline = self.inner.pipeline.lock();
            pipeline.queue.push_back(Queued { action, slot });
            if pipeline.draining {
                return;
            }
            pipeline.draining = true;
        }

        // A panicking reducer must not leave the pipeline marked as draining.
        let _draining = scopeguard::guard_on_unwind((), |()| {
            self.inner.pipeline.lock().draining = false;
        });
        loop {
            let next = {
                let mut pipeline = self.inner.pipeline.lock();
                match pipeline.queue.pop_front() {
                    Some(next) => next,
                    None => {
                        pipeline.draining = false;
                        break;
                    }
                }
            };
            self.process(next);
        }
    }

    /// A clone of the current state.
    pub fn state(&self) -> R::State {
        self.inner.state.borrow().clone()
    }

    /// Read the current state.
    ///
    /// `read` gets a snapshot, so it may send actions to this store.
    pub fn with_state<T>(&self, read: impl FnOnce(&R::State) -> T) -> T {
        read(&self.state())
    }

    /// Borrow the current state. `read` must not send to this store.
    pub(crate) fn project<T>(&self, read: impl FnOnce(&R::State) -> T) -> T {
        read(&self.inner.state.borrow())
    }

    /// Receiver notified after every reduction that changed the state.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.inner.state.subscribe()
    }

    /// Stream of states, yielding only values that differ from the previous one.
    pub fn changes(&self) -> StateChanges<R::State, R::State>
    where
        R::State: Unpin,
    {
        StateChanges::new(self.subscribe(), Arc::new(|state: &R::State| state.clone()))
    }

    /// Project this store onto a child state and action type.
    pub fn scope<S, A>(
        &self,
        state: impl Fn(&R::State) -> S + Send + Sync + 'static,
        action: impl Fn(A) -> R::Action + Send + Sync + 'static,
    ) -> ScopedStore<R, S, A>
    where
        S: 'static,
        A: 'static,
    {
        ScopedStore::new(self.clone(), Arc::new(state), Arc::new(action))
    }

    /// Number of running effects registered under `id`.
    pub fn in_flight(&self, id: &CancelId) -> usize {
        self.inner.effects.in_flight(id)
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.inner.deps
    }

    fn process(&self, queued: Queued<R::Action>) {
        let Queued { action, slot } = queued;
        let inner = &self.inner;
        if inner.settings.log_actions {
            tracing::debug!(action = ?action, "received action");
        }

        let log_changes = inner.settings.log_state_changes;
        let mut effect = None;
        inner.state.send_if_modified(|state| {
            let before = state.clone();
            effect = Some(inner.reducer.reduce(state, action, &inner.deps));
            let changed = *state != before;
            if changed && log_changes {
                if let Some(changes) = diff(&before, &*state) {
                    tracing::debug!("state changed:\n{}", changes);
                }
            }
            changed
        });

        let mut follow_ups = Vec::new();
        for op in effect.map(|e| e.into_operations()).unwrap_or_default() {
            match op {
                Operation::Send(action) => follow_ups.push(action),
                Operation::Run(task) => self.start(task, &slot),
                Operation::Cancel(id) => {
                    let cancelled = inner.effects.cancel(&id);
                    tracing::trace!(cancel_id = %id, cancelled, "cancel effects");
                }
            }
        }

        if !follow_ups.is_empty() {
            let mut pipeline = inner.pipeline.lock();
            for action in follow_ups.into_iter().rev() {
                slot.enqueue();
                pipeline.queue.push_front(Queued {
                    action,
                    slot: Arc::clone(&slot),
                });
            }
        }
        slot.processed();
    }

    fn start(&self, task: Task<R::Action>, slot: &Arc<TaskSlot>) {
        let inner = &self.inner;
        let task_id = inner.effects.next_task_id();
        let cancel_ids = task.cancel_ids.clone();
        let cancelled = Arc::new(AtomicBool::new(false));

        // Emitted actions belong to the send that started the effect.
        let emitter = {
            let store = Arc::downgrade(&self.inner);
            let cancelled = Arc::clone(&cancelled);
            let slot = Arc::clone(slot);
            Emitter::new(move |action| {
                if cancelled.load(Ordering::SeqCst) {
                    tracing::trace!(action = ?action, "dropping action from cancelled effect");
                    return;
                }
                if let Some(inner) = store.upgrade() {
                    slot.enqueue();
                    Store { inner }.dispatch(action, Arc::clone(&slot));
                }
            })
        };
        let future = task.start(emitter);

        inner.effects.register(task_id, &cancel_ids, Arc::clone(&cancelled));
        // Deregister on completion, on abort, and when the task is dropped
        // before its first poll.
        let registration = {
            let store: Weak<StoreInner<R>> = Arc::downgrade(&self.inner);
            let ids = cancel_ids.clone();
            scopeguard::guard((), move |()| {
                if let Some(inner) = store.upgrade() {
                    inner.effects.finished(task_id, &ids);
                }
            })
        };
        let handle = inner.runtime.spawn(async move {
            let _registration = registration;
            future.await;
        });
        inner.effects.attach(task_id, &cancel_ids, &handle.abort_handle());
        if cancelled.load(Ordering::SeqCst) {
            handle.abort();
        }
        tracing::trace!(task_id, cancel_ids = ?cancel_ids, "effect started");
        slot.attach(handle);
    }
}
