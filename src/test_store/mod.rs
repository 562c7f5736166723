//! Deterministic test harness for reducers and their effects.
//!
//! A [`TestStore`] runs the real reducer, but executes effects on a
//! single-threaded executor driven by the test and a [`TestScheduler`]
//! clock that only moves when the test says so. Every step asserts the
//! exact state change it caused; every action produced by an effect must be
//! received explicitly (exhaustive mode) or may be skipped (non-exhaustive
//! mode).
//!
//! ```text
//! Idle ──send──→ AwaitingReducer ──→ Settled
//!                                     │  effects pending / actions queued
//!                                     ↓
//!                               AwaitingReceive ──receive…──→ Settled
//!                                     │
//!                               finish (nothing left) ──→ Completed
//! ```
//!
//! [`TestScheduler`]: crate::scheduler::TestScheduler

mod error;
mod executor;
mod mode;
mod store;

pub use error::TestStoreError;
pub use mode::{Exhaustivity, TestPhase};
pub use store::TestStore;
