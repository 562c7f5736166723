use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use parking_lot::Mutex;

use super::{Scheduler, Sleep};

/// Timers ordered by deadline, then by registration order.
type TimerKey = (Duration, u64);

#[derive(Default)]
struct TimerWheel {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<TimerKey, Option<Waker>>,
}

impl TimerWheel {
    /// Remove every timer due at or before `target` and move the clock.
    fn fire_until(&mut self, target: Duration) -> Vec<Waker> {
        let mut wakers = Vec::new();
        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > target {
                break;
            }
            let ((deadline, _), waker) = entry.remove_entry();
            self.now = self.now.max(deadline);
            wakers.extend(waker);
        }
        self.now = self.now.max(target);
        wakers
    }
}

/// Virtual clock that only moves when told to.
///
/// Sleeps registered on this scheduler never complete on their own: time
/// passes only through [`advance`](Self::advance),
/// [`advance_by`](Self::advance_by) or [`run`](Self::run). Clones share the
/// same clock.
#[derive(Clone, Default)]
pub struct TestScheduler {
    wheel: Arc<Mutex<TimerWheel>>,
}

impl TestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire timers that are already due without moving the clock.
    pub fn advance(&self) {
        self.advance_by(Duration::ZERO);
    }

    /// Move the clock forward, firing every timer due by the new time.
    pub fn advance_by(&self, duration: Duration) {
        let target = self.now().saturating_add(duration);
        self.advance_to(target);
    }

    /// Move the clock to `target`. Moving backwards only fires due timers.
    pub fn advance_to(&self, target: Duration) {
        let wakers = self.wheel.lock().fire_until(target);
        for waker in wakers {
            waker.wake();
        }
    }

    /// Fire every pending timer, moving the clock to the last deadline.
    pub fn run(&self) {
        if let Some(last) = self.last_deadline() {
            self.advance_to(last);
        }
    }

    /// Number of sleeps waiting for the clock to reach their deadline.
    pub fn pending_timers(&self) -> usize {
        self.wheel.lock().timers.len()
    }

    /// Earliest deadline among pending timers.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.wheel.lock().timers.keys().next().map(|(deadline, _)| *deadline)
    }

    fn last_deadline(&self) -> Option<Duration> {
        self.wheel
            .lock()
            .timers
            .keys()
            .next_back()
            .map(|(deadline, _)| *deadline)
    }
}

impl fmt::Debug for TestScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wheel = self.wheel.lock();
        f.debug_struct("TestScheduler")
            .field("now", &wheel.now)
            .field("pending_timers", &wheel.timers.len())
            .finish()
    }
}

impl Scheduler for TestScheduler {
    fn now(&self) -> Duration {
        self.wheel.lock().now
    }

    fn sleep(&self, duration: Duration) -> Sleep {
        let mut wheel = self.wheel.lock();
        let key = (wheel.now.saturating_add(duration), wheel.next_seq);
        wheel.next_seq += 1;
        wheel.timers.insert(key, None);
        Box::pin(VirtualSleep {
            wheel: Arc::clone(&self.wheel),
            key,
        })
    }
}

struct VirtualSleep {
    wheel: Arc<Mutex<TimerWheel>>,
    key: TimerKey,
}

impl Future for VirtualSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut wheel = self.wheel.lock();
        match wheel.timers.get_mut(&self.key) {
            Some(slot) => {
                *slot = Some(cx.waker().clone());
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}

impl Drop for VirtualSleep {
    fn drop(&mut self) {
        // A dropped sleep (e.g. a cancelled effect) must not count as pending.
        self.wheel.lock().timers.remove(&self.key);
    }
}
