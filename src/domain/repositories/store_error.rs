//! Error type shared by all store implementations.

/// Outcome classification for a failed store operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A conditional create found the key already present.
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    /// The operation was certainly not applied (e.g. no connection could be
    /// acquired). Safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation failed or its outcome is unknown. Never retried.
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if retrying the operation cannot apply it twice.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
