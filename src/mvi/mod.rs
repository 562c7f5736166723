//! Model-View-Intent (MVI) primitives.
//!
//! This module provides the base traits for unidirectional data flow.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ View
//!    ↑          │
//!    │          ↓
//!    └────── Effect
//! ```
//!
//! - **State**: plain data owned by a single store
//! - **Action**: user events or effect callbacks
//! - **Reducer**: the only place where state transitions happen; returns
//!   effects describing follow-up work instead of performing it

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::FeatureState;
