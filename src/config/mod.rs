//! Runtime and test-harness configuration.
//!
//! Configuration is optional. Without a file every setting has a default;
//! `FLOWSTATE_CONFIG` may point at a TOML file to override them.

mod loader;
mod types;

pub use loader::{ConfigError, CONFIG_ENV_VAR};
pub use types::{Config, ExhaustivityMode, StoreSettings, TestStoreSettings};
