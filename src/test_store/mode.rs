use crate::config::{ExhaustivityMode, TestStoreSettings};

/// How strictly a [`TestStore`](super::TestStore) checks a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exhaustivity {
    /// Every state change and every received action must be asserted, and
    /// nothing may be left running at teardown.
    #[default]
    On,
    /// Only the scripted steps are checked. Unasserted state changes,
    /// received actions and leftover effects are tolerated.
    Off {
        /// Log what was skipped via `tracing::info!`.
        show_skipped_assertions: bool,
    },
}

impl Exhaustivity {
    /// Non-exhaustive, silently skipping unasserted work.
    pub const fn off() -> Self {
        Exhaustivity::Off {
            show_skipped_assertions: false,
        }
    }
}

impl From<&TestStoreSettings> for Exhaustivity {
    fn from(settings: &TestStoreSettings) -> Self {
        match settings.exhaustivity {
            ExhaustivityMode::On => Exhaustivity::On,
            ExhaustivityMode::Off => Exhaustivity::Off {
                show_skipped_assertions: settings.show_skipped_assertions,
            },
        }
    }
}

/// Where a test run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    /// Nothing has been sent yet.
    Idle,
    /// An action is being reduced.
    AwaitingReducer,
    /// The last step left no queued actions and no running effects.
    Settled,
    /// Received actions are queued or effects are still running.
    AwaitingReceive,
    /// `finish` succeeded.
    Completed,
}
