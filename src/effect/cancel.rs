use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Identity under which in-flight effects can be cancelled.
///
/// Any number of running effects may share an id; cancelling the id tears
/// all of them down. Cancelling an id with nothing in flight is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CancelId(Arc<str>);

impl CancelId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Create an id that cannot collide with any other id in the process.
    pub fn unique(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4()).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CancelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CancelId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for CancelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
