//! Unidirectional state management with explicit, cancellable side effects.
//!
//! A feature is a [`Reducer`] over a state and an action type. Reducers
//! mutate state synchronously and describe follow-up work as an [`Effect`];
//! a [`Store`] runs those effects on tokio and feeds their actions back in.
//! [`TestStore`] runs the same reducer on a deterministic executor and a
//! virtual clock so every state change and every effect output can be
//! asserted.

pub mod compose;
pub mod config;
pub mod dependencies;
pub mod diff;
pub mod effect;
pub mod error;
pub mod logging;
pub mod mvi;
pub mod scheduler;
pub mod store;
pub mod test_store;

pub use compose::{
    ActionPath, Combined, LogChanges, PresentationAction, Presents, Reduce, ReducerExt, Scope,
};
pub use config::{Config, ConfigError};
pub use dependencies::{Dependencies, DependencyKey, UuidGenerator};
pub use effect::{CancelId, Effect, Emitter};
pub use error::StoreError;
pub use mvi::{Action, FeatureState, Reducer};
pub use scheduler::{ImmediateScheduler, Scheduler, TestScheduler, TokioScheduler};
pub use store::{ScopedStore, StateChanges, Store, StoreBuilder, StoreTask};
pub use test_store::{Exhaustivity, TestPhase, TestStore, TestStoreError};
