//! Effects: deferred work returned by reducers.
//!
//! An [`Effect`] is a value. Nothing runs until a store (or the test
//! harness) receives it from a reducer and starts its operations.

mod cancel;
mod effect;
mod emitter;

pub use cancel::CancelId;
pub use effect::Effect;
pub use emitter::Emitter;

pub(crate) use effect::{BoxFuture, Operation, Task};
