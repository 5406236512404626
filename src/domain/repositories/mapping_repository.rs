//! Repository trait for short code mappings.

use crate::domain::entities::Mapping;
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Durable short code → mapping store.
///
/// Rows are never updated in place once written through
/// [`MappingRepository::put_if_absent`]; expiration is a read-time concern.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Atomically creates the mapping if no row exists for its short code.
    ///
    /// The existence check and the insert are one indivisible operation: of two
    /// concurrent calls for the same code exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the code is already mapped.
    async fn put_if_absent(&self, mapping: &Mapping) -> Result<(), StoreError>;

    /// Creates or overwrites the mapping unconditionally.
    ///
    /// Only valid for freshly allocated counter codes, which cannot collide.
    async fn put(&self, mapping: &Mapping) -> Result<(), StoreError>;

    /// Looks up a mapping by short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Mapping))` if found, expired or not
    /// - `Ok(None)` if not found
    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
