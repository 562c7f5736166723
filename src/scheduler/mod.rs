//! Pluggable schedulers for time-based effects.
//!
//! Reducers never touch real timers directly. They ask the scheduler found
//! in their [`Dependencies`](crate::Dependencies) to sleep, which lets tests
//! substitute a manually advanced clock.

mod immediate;
mod live;
mod test_scheduler;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use immediate::ImmediateScheduler;
pub use live::TokioScheduler;
pub use test_scheduler::TestScheduler;

/// Future returned by [`Scheduler::sleep`].
pub type Sleep = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Capability to measure time and wait for it to pass.
pub trait Scheduler: Send + Sync + fmt::Debug {
    /// Time elapsed since the scheduler was created.
    fn now(&self) -> Duration;

    /// Complete after `duration` has passed on this scheduler's clock.
    fn sleep(&self, duration: Duration) -> Sleep;
}
