use thiserror::Error;

/// Assertion failures reported by [`TestStore`](super::TestStore).
#[derive(Debug, Error)]
pub enum TestStoreError {
    /// The state after a step differs from the expected state.
    #[error("State mismatch after {step} (expected: -, actual: +)\n{diff}")]
    StateMismatch { step: String, diff: String },

    /// The next received action is not the one the test expected.
    #[error("Received unexpected action\n  expected: {expected}\n  received: {received}")]
    UnexpectedAction { expected: String, received: String },

    /// The test expected an action but effects produced none.
    #[error("Expected to receive {expected}, but no action was received ({in_flight} effect(s) still in flight)")]
    NoReceivedAction { expected: String, in_flight: usize },

    /// Non-exhaustive receive found no matching action in the queue.
    #[error(
        "Expected to receive {expected}, but none of the {} received action(s) matched:\n{}",
        .received.len(),
        .received.join("\n")
    )]
    NoMatchingAction {
        expected: String,
        received: Vec<String>,
    },

    /// Received actions were left unasserted before another step.
    #[error(
        "Must handle {} received action(s) before {context}:\n{}",
        .actions.len(),
        .actions.join("\n")
    )]
    UnhandledActions {
        context: &'static str,
        actions: Vec<String>,
    },

    /// Effects were still running when the test ended.
    #[error("{count} effect(s) still in flight at teardown; receive their output, cancel them, or skip them explicitly")]
    InFlightEffects { count: usize },

    /// Timers on the test scheduler were never fired.
    #[error("{count} scheduled timer(s) still pending at teardown")]
    PendingTimers { count: usize },

    /// Effects kept waking each other without settling.
    #[error("Effects did not settle after {iterations} executor passes")]
    SettleLimitExceeded { iterations: usize },
}
