//! Short code allocation.
//!
//! Generated codes come from a store-side counter encoded in base 62. Custom
//! aliases are reserved with a single conditional write that creates the
//! mapping. No code path checks for existence before writing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Mapping, MappingDraft};
use crate::domain::repositories::{
    CounterRepository, MappingRepository, StoreError, URL_COUNTER_ID,
};
use crate::utils::base62;
use crate::utils::validation::validate_custom_alias;

/// Counter values tried before giving up when generated codes keep landing
/// on existing custom aliases.
const MAX_GENERATION_ATTEMPTS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid custom alias {alias:?}: {reason}")]
    InvalidAlias { alias: String, reason: String },

    #[error("custom alias already taken: {0}")]
    AliasTaken(String),

    #[error("short code allocation failed: {0}")]
    AllocationFailed(#[source] StoreError),
}

/// Allocates unique short codes and persists their mappings.
pub struct Allocator {
    mappings: Arc<dyn MappingRepository>,
    counters: Arc<dyn CounterRepository>,
}

impl Allocator {
    /// Creates a new allocator over the given stores.
    pub fn new(mappings: Arc<dyn MappingRepository>, counters: Arc<dyn CounterRepository>) -> Self {
        Self { mappings, counters }
    }

    /// Checks a custom alias without touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::InvalidAlias`] on a charset or length violation.
    pub fn check_alias(alias: &str) -> Result<(), AllocationError> {
        validate_custom_alias(alias).map_err(|reason| AllocationError::InvalidAlias {
            alias: alias.to_string(),
            reason,
        })
    }

    /// Allocates a short code for `draft` and writes its mapping.
    ///
    /// With a custom alias the alias itself is reserved; otherwise the next
    /// counter value is used. Either way the returned mapping is persisted.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidAlias`] if the alias is malformed
    /// - [`AllocationError::AliasTaken`] if the alias is already mapped
    /// - [`AllocationError::AllocationFailed`] on store failure
    pub async fn allocate(
        &self,
        custom_alias: Option<&str>,
        draft: &MappingDraft,
    ) -> Result<Mapping, AllocationError> {
        match custom_alias {
            Some(alias) => self.reserve_alias(alias, draft).await,
            None => self.allocate_generated(draft).await,
        }
    }

    /// Atomically reserves `alias` by creating its mapping.
    ///
    /// Of two concurrent reservations of the same alias exactly one succeeds.
    pub async fn reserve_alias(
        &self,
        alias: &str,
        draft: &MappingDraft,
    ) -> Result<Mapping, AllocationError> {
        Self::check_alias(alias)?;

        let mapping = draft.with_code(alias);

        match self.mappings.put_if_absent(&mapping).await {
            Ok(()) => {
                info!("Reserved custom alias {}", alias);
                Ok(mapping)
            }
            Err(StoreError::AlreadyExists(_)) => {
                debug!("Custom alias {} already taken", alias);
                metrics::counter!("shortener_alias_conflicts_total").increment(1);
                Err(AllocationError::AliasTaken(alias.to_string()))
            }
            Err(e) => Err(AllocationError::AllocationFailed(e)),
        }
    }

    /// Returns the next generated short code.
    ///
    /// Lazily creates the counter, then increments it and encodes the new
    /// value. A failed increment leaves the counter row in place, so the
    /// call can simply be repeated.
    pub async fn next_code(&self) -> Result<String, AllocationError> {
        match self.counters.ensure_exists(URL_COUNTER_ID).await {
            // Lost the creation race to another caller: the row exists.
            Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
            Err(e) => return Err(AllocationError::AllocationFailed(e)),
        }

        let value = self
            .counters
            .increment(URL_COUNTER_ID)
            .await
            .map_err(AllocationError::AllocationFailed)?;

        Ok(base62::encode(value))
    }

    /// Writes `draft` under the next free generated code.
    ///
    /// Counter values are never reused, but a custom alias may already occupy
    /// the encoded value. Such values are skipped rather than overwritten.
    async fn allocate_generated(&self, draft: &MappingDraft) -> Result<Mapping, AllocationError> {
        let mut last_conflict = None;

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let mapping = draft.with_code(self.next_code().await?);

            match self.mappings.put_if_absent(&mapping).await {
                Ok(()) => {
                    debug!("Allocated generated code {}", mapping.short_code);
                    return Ok(mapping);
                }
                Err(e @ StoreError::AlreadyExists(_)) => {
                    warn!(
                        "Generated code {} collides with a custom alias, skipping",
                        mapping.short_code
                    );
                    last_conflict = Some(e);
                }
                Err(e) => return Err(AllocationError::AllocationFailed(e)),
            }
        }

        Err(AllocationError::AllocationFailed(last_conflict.unwrap_or_else(
            || StoreError::Backend("no allocation attempt was made".to_string()),
        )))
    }
}
