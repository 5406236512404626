//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::Mapping;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching mapping records.
///
/// Implementations must be thread-safe and fail open: a cache failure
/// degrades to a store lookup, it never fails the redirect.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(mapping))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_mapping(&self, short_code: &str) -> CacheResult<Option<Mapping>>;

    /// Stores a mapping with an optional TTL in seconds.
    ///
    /// `None` uses the implementation's default TTL.
    async fn set_mapping(&self, mapping: &Mapping, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
