use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSettings,
    pub test_store: TestStoreSettings,
}

/// Settings for the live [`Store`](crate::Store).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Trace every action entering the pipeline at `debug` level.
    pub log_actions: bool,
    /// Trace a structural diff after every state change at `debug` level.
    pub log_state_changes: bool,
}

/// Default exhaustivity for new test stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustivityMode {
    #[default]
    On,
    Off,
}

/// Settings for [`TestStore`](crate::TestStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestStoreSettings {
    pub exhaustivity: ExhaustivityMode,
    /// In non-exhaustive mode, log what was skipped instead of staying silent.
    pub show_skipped_assertions: bool,
    /// Upper bound on executor passes per settle before the harness gives up
    /// on effects that keep waking each other.
    pub max_settle_iterations: usize,
}

impl Default for TestStoreSettings {
    fn default() -> Self {
        Self {
            exhaustivity: ExhaustivityMode::On,
            show_skipped_assertions: false,
            max_settle_iterations: 10_000,
        }
    }
}
