use std::time::Duration;

use super::{Scheduler, Sleep};

/// Scheduler whose sleeps complete immediately and whose clock never moves.
///
/// Useful in tests that do not care about timing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn sleep(&self, _duration: Duration) -> Sleep {
        Box::pin(std::future::ready(()))
    }
}
