//! Repository trait for the short code counter.

use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Key of the singleton counter backing generated short codes.
pub const URL_COUNTER_ID: &str = "url_counter";

/// Store of monotonically increasing counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Creates the counter with value `0` unless it already exists.
    ///
    /// Idempotent and safe under concurrent first use. Implementations may
    /// report a lost creation race as [`StoreError::AlreadyExists`]; callers
    /// treat that as success.
    async fn ensure_exists(&self, counter_id: &str) -> Result<(), StoreError>;

    /// Atomically adds one to the counter and returns the new value.
    ///
    /// N concurrent calls observe N distinct values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the counter row does not exist.
    async fn increment(&self, counter_id: &str) -> Result<u64, StoreError>;
}
