//! Short code resolution service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::Mapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::validation::validate_custom_alias;

/// Where a valid short code redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub long_url: String,
}

/// Resolves short codes, applying expiration at read time.
///
/// Reads never mutate the store. Expired mappings stay in place and keep
/// resolving to [`AppError::Expired`], distinct from unknown codes.
pub struct RedirectService {
    mappings: Arc<dyn MappingRepository>,
    cache: Arc<dyn CacheService>,
}

impl RedirectService {
    /// Creates a new redirect service with a read-through cache.
    pub fn new(mappings: Arc<dyn MappingRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { mappings, cache }
    }

    /// Resolves `short_code` against the current wall-clock time.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no mapping exists
    /// - [`AppError::Expired`] if the mapping's expiration time has passed
    /// - [`AppError::Internal`] on store errors
    pub async fn resolve(&self, short_code: &str) -> Result<RedirectTarget, AppError> {
        self.resolve_at(short_code, Utc::now().timestamp()).await
    }

    /// Resolves `short_code` as of `now` (epoch seconds).
    pub async fn resolve_at(&self, short_code: &str, now: i64) -> Result<RedirectTarget, AppError> {
        let mapping = match self.lookup(short_code).await? {
            Some(mapping) => mapping,
            None => {
                metrics::counter!("shortener_resolutions_total", "outcome" => "not_found")
                    .increment(1);
                return Err(AppError::not_found(
                    "Not Found",
                    json!({ "short_code": short_code }),
                ));
            }
        };

        if mapping.is_expired_at(now) {
            debug!("Short code {} expired at {:?}", short_code, mapping.expiration_time);
            metrics::counter!("shortener_resolutions_total", "outcome" => "expired").increment(1);
            return Err(AppError::expired(
                "Expired",
                json!({ "short_code": short_code }),
            ));
        }

        metrics::counter!("shortener_resolutions_total", "outcome" => "found").increment(1);
        Ok(RedirectTarget {
            long_url: mapping.long_url,
        })
    }

    /// Cache first, then the store. Store hits are written back to the cache.
    async fn lookup(&self, short_code: &str) -> Result<Option<Mapping>, AppError> {
        // Codes outside the alias charset can never have been written.
        if validate_custom_alias(short_code).is_err() {
            return Ok(None);
        }

        match self.cache.get_mapping(short_code).await {
            Ok(Some(mapping)) => return Ok(Some(mapping)),
            Ok(None) => {}
            Err(e) => warn!("Cache error, falling back to store: {}", e),
        }

        let mapping = self.mappings.get(short_code).await?;

        if let Some(ref mapping) = mapping
            && let Err(e) = self.cache.set_mapping(mapping, None).await
        {
            warn!("Failed to cache mapping {}: {}", short_code, e);
        }

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockMappingRepository, StoreError};
    use crate::infrastructure::cache::{CacheResult, NullCache};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn mapping(code: &str, expiration_time: Option<i64>) -> Mapping {
        Mapping::new(
            code.to_string(),
            "https://example.com/target".to_string(),
            Utc::now(),
            expiration_time,
        )
    }

    fn service(mappings: MockMappingRepository) -> RedirectService {
        RedirectService::new(Arc::new(mappings), Arc::new(NullCache::new()))
    }

    /// Cache double recording writes and serving a fixed hit.
    #[derive(Default)]
    struct RecordingCache {
        hit: Option<Mapping>,
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CacheService for RecordingCache {
        async fn get_mapping(&self, _short_code: &str) -> CacheResult<Option<Mapping>> {
            Ok(self.hit.clone())
        }

        async fn set_mapping(&self, mapping: &Mapping, _ttl: Option<u64>) -> CacheResult<()> {
            self.writes.lock().unwrap().push(mapping.short_code.clone());
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .withf(|code| code == "abc")
            .returning(|code| Ok(Some(mapping(code, None))));

        let target = service(mappings).resolve("abc").await.unwrap();
        assert_eq!(target.long_url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mappings = MockMappingRepository::new();
        mappings.expect_get().returning(|_| Ok(None));

        let result = service(mappings).resolve("doesnotexist").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_expired_is_distinct_from_not_found() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .returning(|code| Ok(Some(mapping(code, Some(1_577_836_800)))));

        let result = service(mappings).resolve("old").await;
        assert!(matches!(result, Err(AppError::Expired { .. })));
    }

    #[tokio::test]
    async fn test_resolve_at_expiration_boundary() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .returning(|code| Ok(Some(mapping(code, Some(1_000)))));
        let service = service(mappings);

        assert!(service.resolve_at("edge", 1_000).await.is_ok());
        assert!(matches!(
            service.resolve_at("edge", 1_001).await,
            Err(AppError::Expired { .. })
        ));
    }

    #[tokio::test]
    async fn test_legacy_zero_expiration_never_expires() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .returning(|code| Ok(Some(mapping(code, Some(0)))));

        assert!(service(mappings).resolve("legacy").await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_code_skips_store() {
        let mut mappings = MockMappingRepository::new();
        mappings.expect_get().times(0);
        let service = service(mappings);

        assert!(matches!(
            service.resolve("not a code").await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            service.resolve(&"a".repeat(65)).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_error_is_internal() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .returning(|_| Err(StoreError::Backend("connection reset".into())));

        let result = service(mappings).resolve("abc").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store_but_checks_expiry() {
        let mut mappings = MockMappingRepository::new();
        mappings.expect_get().times(0);
        let cache = Arc::new(RecordingCache {
            hit: Some(mapping("cached", Some(1_577_836_800))),
            ..Default::default()
        });

        let service = RedirectService::new(Arc::new(mappings), cache);
        let result = service.resolve("cached").await;

        assert!(matches!(result, Err(AppError::Expired { .. })));
    }

    #[tokio::test]
    async fn test_store_hit_is_cached() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_get()
            .times(1)
            .returning(|code| Ok(Some(mapping(code, None))));
        let cache = Arc::new(RecordingCache::default());

        let service = RedirectService::new(Arc::new(mappings), cache.clone());
        service.resolve("abc").await.unwrap();

        assert_eq!(*cache.writes.lock().unwrap(), vec!["abc".to_string()]);
    }
}
