use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::cancel::CancelId;
use super::emitter::Emitter;
use crate::scheduler::Scheduler;

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

type Work<A> = Box<dyn FnOnce(Emitter<A>) -> BoxFuture + Send + 'static>;

/// Asynchronous unit of work plus the cancel ids it is registered under.
pub(crate) struct Task<A> {
    pub(crate) work: Work<A>,
    pub(crate) cancel_ids: Vec<CancelId>,
}

impl<A: Send + 'static> Task<A> {
    fn new<F, Fut>(work: F) -> Self
    where
        F: FnOnce(Emitter<A>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            work: Box::new(move |emitter| Box::pin(work(emitter)) as BoxFuture),
            cancel_ids: Vec::new(),
        }
    }

    pub(crate) fn start(self, emitter: Emitter<A>) -> BoxFuture {
        (self.work)(emitter)
    }
}

pub(crate) enum Operation<A> {
    /// Fed back synchronously, right after the reducer returns.
    Send(A),
    Run(Task<A>),
    Cancel(CancelId),
}

/// Follow-up work returned by a reducer.
///
/// Operations are started in order. Synchronous sends are fed back before any
/// other queued action; asynchronous work may emit any number of actions and
/// completes in whatever order it finishes.
#[must_use = "effects do nothing unless returned to a store"]
pub struct Effect<A> {
    ops: Vec<Operation<A>>,
}

impl<A: Send + 'static> Effect<A> {
    /// An effect that does nothing.
    pub fn none() -> Self {
        Self { ops: Vec::new() }
    }

    /// Feed `action` back into the store immediately.
    pub fn send(action: A) -> Self {
        Self {
            ops: vec![Operation::Send(action)],
        }
    }

    /// Run asynchronous work that may emit any number of actions.
    pub fn run<F, Fut>(work: F) -> Self
    where
        F: FnOnce(Emitter<A>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            ops: vec![Operation::Run(Task::new(work))],
        }
    }

    /// Run a future and feed its output back as a single action.
    pub fn future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::run(move |emitter| async move {
            emitter.emit(future.await);
        })
    }

    /// Cancel every in-flight effect registered under `id`.
    pub fn cancel(id: impl Into<CancelId>) -> Self {
        Self {
            ops: vec![Operation::Cancel(id.into())],
        }
    }

    /// Start all effects at once.
    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        Self {
            ops: effects.into_iter().flat_map(|effect| effect.ops).collect(),
        }
    }

    pub fn merge_with(mut self, other: Effect<A>) -> Self {
        self.ops.extend(other.ops);
        self
    }

    /// Register the asynchronous work of this effect under `id`.
    ///
    /// With `cancel_in_flight`, work already running under `id` is cancelled
    /// before this effect starts. Effects without asynchronous work are
    /// returned unchanged.
    pub fn cancellable(self, id: impl Into<CancelId>, cancel_in_flight: bool) -> Self {
        if !self.has_async_work() {
            return self;
        }
        let id = id.into();
        let mut ops = Vec::with_capacity(self.ops.len() + 1);
        if cancel_in_flight {
            ops.push(Operation::Cancel(id.clone()));
        }
        for op in self.ops {
            match op {
                Operation::Run(mut task) => {
                    task.cancel_ids.push(id.clone());
                    ops.push(Operation::Run(task));
                }
                other => ops.push(other),
            }
        }
        Self { ops }
    }

    /// Delay this effect by `duration` on `scheduler`, restarting the delay
    /// whenever another effect is debounced under the same `id`.
    pub fn debounce(
        self,
        id: impl Into<CancelId>,
        duration: Duration,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let ops = self
            .ops
            .into_iter()
            .map(|op| match op {
                Operation::Send(action) => {
                    let scheduler = Arc::clone(&scheduler);
                    Operation::Run(Task::new(move |emitter| {
                        let sleep = scheduler.sleep(duration);
                        async move {
                            sleep.await;
                            emitter.emit(action);
                        }
                    }))
                }
                Operation::Run(task) => {
                    let scheduler = Arc::clone(&scheduler);
                    let cancel_ids = task.cancel_ids;
                    let work = task.work;
                    Operation::Run(Task {
                        work: Box::new(move |emitter: Emitter<A>| {
                            let sleep = scheduler.sleep(duration);
                            Box::pin(async move {
                                sleep.await;
                                work(emitter).await;
                            }) as BoxFuture
                        }),
                        cancel_ids,
                    })
                }
                cancel => cancel,
            })
            .collect();
        Self { ops }.cancellable(id, true)
    }

    /// Transform the actions produced by this effect.
    pub fn map<B, F>(self, transform: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let transform: Arc<dyn Fn(A) -> B + Send + Sync> = Arc::new(transform);
        let ops = self
            .ops
            .into_iter()
            .map(|op| match op {
                Operation::Send(action) => Operation::Send(transform(action)),
                Operation::Run(task) => {
                    let transform = Arc::clone(&transform);
                    let work = task.work;
                    Operation::Run(Task {
                        work: Box::new(move |emitter: Emitter<B>| {
                            work(emitter.contramap(transform))
                        }),
                        cancel_ids: task.cancel_ids,
                    })
                }
                Operation::Cancel(id) => Operation::Cancel(id),
            })
            .collect();
        Effect { ops }
    }

    pub fn is_none(&self) -> bool {
        self.ops.is_empty()
    }

    fn has_async_work(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, Operation::Run(_)))
    }

    pub(crate) fn into_operations(self) -> Vec<Operation<A>> {
        self.ops
    }
}

impl<A: fmt::Debug> fmt::Debug for Operation<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Operation::Run(task) => f.debug_tuple("Run").field(&task.cancel_ids).finish(),
            Operation::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.ops).finish()
    }
}
