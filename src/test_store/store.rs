use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use super::error::TestStoreError;
use super::executor::Executor;
use super::mode::{Exhaustivity, TestPhase};
use crate::config::TestStoreSettings;
use crate::dependencies::Dependencies;
use crate::diff::diff;
use crate::effect::Operation;
use crate::mvi::Reducer;
use crate::scheduler::{Scheduler, TestScheduler};

/// An action produced by an effect, with the state right after reducing it.
struct Received<A, S> {
    action: A,
    state: S,
}

/// Store for exercising a reducer step by step.
///
/// ```ignore
/// let mut store = TestStore::new(TwoFactorState::new("token"), TwoFactorReducer);
/// store.send(TwoFactorAction::CodeChanged("1234".into()), |state| {
///     state.code = "1234".into();
///     state.is_form_valid = true;
/// });
/// store.finish();
/// ```
///
/// The store must be finished before it is dropped. Dropping an unfinished
/// store runs the teardown checks and panics if any of them fail.
pub struct TestStore<R: Reducer> {
    reducer: R,
    deps: Dependencies,
    scheduler: TestScheduler,
    /// State as the reducer left it.
    state: R::State,
    /// State as of the last assertion.
    asserted: R::State,
    received: VecDeque<Received<R::Action, R::State>>,
    executor: Executor<R::Action>,
    exhaustivity: Exhaustivity,
    max_settle_iterations: usize,
    phase: TestPhase,
    finished: bool,
}

impl<R: Reducer> TestStore<R> {
    /// Exhaustive test store with test dependencies.
    pub fn new(initial_state: R::State, reducer: R) -> Self {
        Self::build(initial_state, reducer, &TestStoreSettings::default(), |_| {})
    }

    /// Test store whose dependencies are adjusted by `configure`.
    ///
    /// `configure` starts from [`Dependencies::test`] backed by this store's
    /// [`TestScheduler`].
    pub fn with_dependencies(
        initial_state: R::State,
        reducer: R,
        configure: impl FnOnce(&mut Dependencies),
    ) -> Self {
        Self::build(initial_state, reducer, &TestStoreSettings::default(), configure)
    }

    /// Test store configured from the `[test_store]` config section.
    pub fn with_settings(
        initial_state: R::State,
        reducer: R,
        settings: &TestStoreSettings,
        configure: impl FnOnce(&mut Dependencies),
    ) -> Self {
        Self::build(initial_state, reducer, settings, configure)
    }

    fn build(
        initial_state: R::State,
        reducer: R,
        settings: &TestStoreSettings,
        configure: impl FnOnce(&mut Dependencies),
    ) -> Self {
        let scheduler = TestScheduler::new();
        let mut deps = Dependencies::test(Arc::new(scheduler.clone()));
        configure(&mut deps);
        Self {
            reducer,
            deps,
            scheduler,
            asserted: initial_state.clone(),
            state: initial_state,
            received: VecDeque::new(),
            executor: Executor::new(),
            exhaustivity: Exhaustivity::from(settings),
            max_settle_iterations: settings.max_settle_iterations.max(1),
            phase: TestPhase::Idle,
            finished: false,
        }
    }

    pub fn exhaustivity(&self) -> Exhaustivity {
        self.exhaustivity
    }

    /// Switch modes mid-test. Leaving non-exhaustive mode takes the current
    /// state as the new baseline.
    pub fn set_exhaustivity(&mut self, exhaustivity: Exhaustivity) {
        if exhaustivity == Exhaustivity::On && self.exhaustivity != Exhaustivity::On {
            self.asserted = self.state.clone();
        }
        self.exhaustivity = exhaustivity;
    }

    /// Current state as the reducer left it.
    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// The virtual clock driving every time-based effect in this store.
    pub fn scheduler(&self) -> &TestScheduler {
        &self.scheduler
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    /// Change dependencies for the steps that follow.
    pub fn dependencies_mut(&mut self) -> &mut Dependencies {
        &mut self.deps
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    /// Actions produced by effects that have not been asserted yet.
    pub fn received_count(&self) -> usize {
        self.received.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.executor.in_flight()
    }

    /// Send an action and assert the state change it causes.
    ///
    /// `update` receives the previously asserted state (exhaustive) or the
    /// actual state (non-exhaustive) and must turn it into the state the
    /// reducer produced.
    ///
    /// # Panics
    /// On any assertion failure, see [`try_send`](Self::try_send).
    #[track_caller]
    pub fn send(&mut self, action: R::Action, update: impl FnOnce(&mut R::State)) {
        if let Err(error) = self.try_send(action, update) {
            panic!("{}", error);
        }
    }

    /// Fallible form of [`send`](Self::send).
    pub fn try_send(
        &mut self,
        action: R::Action,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        self.settle()?;
        self.flush_received("sending an action")?;

        let step = format!("send({:?})", action);
        tracing::debug!(action = ?action, "test store send");
        self.phase = TestPhase::AwaitingReducer;
        self.reduce(action);
        let after = self.state.clone();
        let settled = self.settle();
        let checked = self.check_state(&step, after, update);
        self.update_phase();
        settled.and(checked)
    }

    /// Assert the current state without sending anything.
    #[track_caller]
    pub fn assert_state(&mut self, update: impl FnOnce(&mut R::State)) {
        if let Err(error) = self.try_assert_state(update) {
            panic!("{}", error);
        }
    }

    pub fn try_assert_state(
        &mut self,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        self.settle()?;
        let actual = self.state.clone();
        self.check_state("assert_state", actual, update)
    }

    /// Assert an action matching `matches` was received from an effect, and
    /// the state change it caused.
    #[track_caller]
    pub fn receive_matching(
        &mut self,
        description: &str,
        matches: impl Fn(&R::Action) -> bool,
        update: impl FnOnce(&mut R::State),
    ) {
        if let Err(error) = self.try_receive_matching(description, matches, update) {
            panic!("{}", error);
        }
    }

    pub fn try_receive_matching(
        &mut self,
        description: &str,
        matches: impl Fn(&R::Action) -> bool,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        self.receive_where(description.to_string(), matches, update)
    }

    /// Run effects until nothing is ready, without moving the clock.
    ///
    /// Timers already due fire; nothing else does.
    #[track_caller]
    pub fn advance(&mut self) {
        if let Err(error) = self.try_advance_by(Duration::ZERO) {
            panic!("{}", error);
        }
    }

    /// Move the virtual clock forward, running effects at every intermediate
    /// deadline in order.
    #[track_caller]
    pub fn advance_by(&mut self, duration: Duration) {
        if let Err(error) = self.try_advance_by(duration) {
            panic!("{}", error);
        }
    }

    pub fn try_advance_by(&mut self, duration: Duration) -> Result<(), TestStoreError> {
        self.settle()?;
        let target = self.scheduler.now().saturating_add(duration);
        let limit = self.max_settle_iterations;
        let mut passes = 0usize;
        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > target {
                break;
            }
            passes += 1;
            if passes > limit {
                return Err(TestStoreError::SettleLimitExceeded { iterations: limit });
            }
            self.scheduler.advance_to(deadline);
            self.settle()?;
        }
        self.scheduler.advance_to(target);
        self.settle()?;
        self.update_phase();
        Ok(())
    }

    /// Fire every timer, including ones scheduled while running, until none
    /// are left.
    #[track_caller]
    pub fn run_scheduler(&mut self) {
        if let Err(error) = self.try_run_scheduler() {
            panic!("{}", error);
        }
    }

    pub fn try_run_scheduler(&mut self) -> Result<(), TestStoreError> {
        self.settle()?;
        let limit = self.max_settle_iterations;
        let mut passes = 0usize;
        while let Some(deadline) = self.scheduler.next_deadline() {
            passes += 1;
            if passes > limit {
                return Err(TestStoreError::SettleLimitExceeded { iterations: limit });
            }
            self.scheduler.advance_to(deadline);
            self.settle()?;
        }
        self.update_phase();
        Ok(())
    }

    /// Drop every received action that was not asserted.
    pub fn skip_received_actions(&mut self) {
        if let Err(error) = self.settle() {
            tracing::warn!(%error, "effects did not settle while skipping received actions");
        }
        let skipped = self.received.len();
        self.received.clear();
        self.asserted = self.state.clone();
        tracing::debug!(skipped, "skipped received actions");
        self.update_phase();
    }

    /// Cancel every effect still running.
    pub fn skip_in_flight_effects(&mut self) {
        let skipped = self.executor.cancel_all();
        tracing::debug!(skipped, "skipped in-flight effects");
        self.update_phase();
    }

    /// Assert nothing is left over.
    ///
    /// Exhaustive stores fail on unasserted received actions, effects still
    /// in flight and pending timers. Non-exhaustive stores discard them.
    #[track_caller]
    pub fn finish(&mut self) {
        if let Err(error) = self.try_finish() {
            panic!("{}", error);
        }
    }

    pub fn try_finish(&mut self) -> Result<(), TestStoreError> {
        self.finished = true;
        self.settle()?;

        if let Exhaustivity::Off {
            show_skipped_assertions,
        } = self.exhaustivity
        {
            let actions = self.received.len();
            let effects = self.executor.cancel_all();
            self.received.clear();
            if show_skipped_assertions && (actions > 0 || effects > 0) {
                tracing::info!(actions, effects, "skipped at teardown");
            }
            self.phase = TestPhase::Completed;
            return Ok(());
        }

        if !self.received.is_empty() {
            return Err(TestStoreError::UnhandledActions {
                context: "finishing",
                actions: self.describe_received(),
            });
        }
        let count = self.executor.in_flight();
        if count > 0 {
            return Err(TestStoreError::InFlightEffects { count });
        }
        let count = self.scheduler.pending_timers();
        if count > 0 {
            return Err(TestStoreError::PendingTimers { count });
        }
        self.phase = TestPhase::Completed;
        Ok(())
    }

    fn reduce(&mut self, action: R::Action) {
        let effect = self.reducer.reduce(&mut self.state, action, &self.deps);
        let mut sends = Vec::new();
        for op in effect.into_operations() {
            match op {
                Operation::Send(action) => sends.push(action),
                Operation::Run(task) => self.executor.spawn(task),
                Operation::Cancel(id) => {
                    let cancelled = self.executor.cancel(&id);
                    tracing::trace!(cancel_id = %id, cancelled, "cancel test effects");
                }
            }
        }
        if !sends.is_empty() {
            self.executor.send_now(sends);
        }
    }

    /// Poll effects and reduce their output until nothing is ready.
    ///
    /// Every poll pass and every reduced action counts towards
    /// `max_settle_iterations`.
    fn settle(&mut self) -> Result<(), TestStoreError> {
        let limit = self.max_settle_iterations;
        let mut steps = 0usize;
        loop {
            steps += 1;
            if steps > limit {
                return Err(TestStoreError::SettleLimitExceeded { iterations: limit });
            }
            let mut progressed = self.executor.poll_woken();
            while let Some(action) = self.executor.next_emitted() {
                progressed = true;
                steps += 1;
                if steps > limit {
                    return Err(TestStoreError::SettleLimitExceeded { iterations: limit });
                }
                tracing::debug!(action = ?action, "test store received");
                self.reduce(action.clone());
                self.received.push_back(Received {
                    action,
                    state: self.state.clone(),
                });
            }
            if !progressed {
                return Ok(());
            }
        }
    }

    /// Exhaustive stores refuse to continue past unasserted actions;
    /// non-exhaustive stores drop them.
    fn flush_received(&mut self, context: &'static str) -> Result<(), TestStoreError> {
        if self.received.is_empty() {
            return Ok(());
        }
        match self.exhaustivity {
            Exhaustivity::On => Err(TestStoreError::UnhandledActions {
                context,
                actions: self.describe_received(),
            }),
            Exhaustivity::Off {
                show_skipped_assertions,
            } => {
                if show_skipped_assertions {
                    tracing::info!(
                        "skipped {} received action(s):\n{}",
                        self.received.len(),
                        self.describe_received().join("\n")
                    );
                }
                self.received.clear();
                Ok(())
            }
        }
    }

    fn receive_where(
        &mut self,
        expected: String,
        matches: impl Fn(&R::Action) -> bool,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        self.settle()?;
        if self.received.is_empty() {
            return Err(TestStoreError::NoReceivedAction {
                expected,
                in_flight: self.executor.in_flight(),
            });
        }

        if let Exhaustivity::Off {
            show_skipped_assertions,
        } = self.exhaustivity
        {
            let Some(position) = self.received.iter().position(|r| matches(&r.action)) else {
                return Err(TestStoreError::NoMatchingAction {
                    expected,
                    received: self.describe_received(),
                });
            };
            let skipped: Vec<_> = self.received.drain(..position).collect();
            if show_skipped_assertions && !skipped.is_empty() {
                tracing::info!(
                    "skipped {} received action(s) before {}:\n{}",
                    skipped.len(),
                    expected,
                    skipped
                        .iter()
                        .map(|r| format!("  {:?}", r.action))
                        .collect::<Vec<_>>()
                        .join("\n")
                );
            }
        }

        let Some(received) = self.received.pop_front() else {
            return Err(TestStoreError::NoReceivedAction {
                expected,
                in_flight: self.executor.in_flight(),
            });
        };
        if !matches(&received.action) {
            self.asserted = received.state;
            self.update_phase();
            return Err(TestStoreError::UnexpectedAction {
                expected,
                received: format!("{:?}", received.action),
            });
        }

        tracing::debug!(action = ?received.action, "test store asserted receive");
        let step = format!("receive({:?})", received.action);
        let result = self.check_state(&step, received.state, update);
        self.update_phase();
        result
    }

    /// Compare `actual` against the state `update` describes, then make
    /// `actual` the new baseline whatever the outcome.
    fn check_state(
        &mut self,
        step: &str,
        actual: R::State,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        let result = match self.exhaustivity {
            Exhaustivity::On => {
                let mut expected = self.asserted.clone();
                update(&mut expected);
                mismatch(step, &expected, &actual)
            }
            Exhaustivity::Off {
                show_skipped_assertions,
            } => {
                let mut expected = actual.clone();
                update(&mut expected);
                let result = mismatch(step, &expected, &actual);
                if result.is_ok() && show_skipped_assertions && actual != self.asserted {
                    if let Some(changes) = diff(&self.asserted, &actual) {
                        tracing::info!("state changes covered by {}:\n{}", step, changes);
                    }
                }
                result
            }
        };
        self.asserted = actual;
        result
    }

    fn describe_received(&self) -> Vec<String> {
        self.received
            .iter()
            .map(|received| format!("  {:?}", received.action))
            .collect()
    }

    fn update_phase(&mut self) {
        if self.phase == TestPhase::Completed {
            return;
        }
        self.phase = if self.received.is_empty() && self.executor.in_flight() == 0 {
            TestPhase::Settled
        } else {
            TestPhase::AwaitingReceive
        };
    }
}

impl<R: Reducer> TestStore<R>
where
    R::Action: PartialEq,
{
    /// Assert `expected` was the next action received from an effect, and
    /// the state change it caused.
    ///
    /// Non-exhaustive stores skip earlier received actions until one equals
    /// `expected`.
    #[track_caller]
    pub fn receive(&mut self, expected: R::Action, update: impl FnOnce(&mut R::State)) {
        if let Err(error) = self.try_receive(expected, update) {
            panic!("{}", error);
        }
    }

    pub fn try_receive(
        &mut self,
        expected: R::Action,
        update: impl FnOnce(&mut R::State),
    ) -> Result<(), TestStoreError> {
        let description = format!("{:?}", expected);
        self.receive_where(description, |action| *action == expected, update)
    }
}

impl<R: Reducer> Drop for TestStore<R> {
    fn drop(&mut self) {
        if self.finished || std::thread::panicking() {
            return;
        }
        if let Err(error) = self.try_finish() {
            panic!("{}", error);
        }
    }
}

fn mismatch<S: PartialEq + Debug>(step: &str, expected: &S, actual: &S) -> Result<(), TestStoreError> {
    if expected == actual {
        return Ok(());
    }
    Err(TestStoreError::StateMismatch {
        step: step.to_string(),
        diff: diff(expected, actual)
            .unwrap_or_else(|| "values differ but render identically".to_string()),
    })
}
