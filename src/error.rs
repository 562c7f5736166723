use thiserror::Error;

/// Errors that can occur when building a live [`Store`](crate::Store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Effects run on tokio; building outside a runtime needs an explicit handle.
    #[error("No tokio runtime available: build the store inside a runtime or pass a handle")]
    NoRuntime,
}
