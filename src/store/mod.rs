//! Live store runtime.
//!
//! A [`Store`] owns the single authoritative state of a feature. Actions are
//! funnelled through one serialized pipeline; effects run as tokio tasks and
//! feed their actions back through the same pipeline.

mod changes;
mod registry;
mod scoped;
mod store;
mod task;

pub use changes::StateChanges;
pub use scoped::ScopedStore;
pub use store::{Store, StoreBuilder};
pub use task::StoreTask;
