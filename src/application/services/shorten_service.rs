//! Link shortening service.

use std::sync::Arc;

use tracing::info;

use crate::application::services::allocator::Allocator;
use crate::domain::entities::{Mapping, MappingDraft};
use crate::error::AppError;
use crate::utils::host_context::build_short_url;
use crate::utils::validation::{parse_expiration_date, validate_long_url};

/// Result of a successful shorten call.
#[derive(Debug, Clone)]
pub struct ShortenedLink {
    /// The persisted mapping.
    pub mapping: Mapping,
    /// Absolute short URL under the caller's base URL.
    pub short_url: String,
    /// True if the code was supplied by the caller rather than generated.
    pub is_custom_alias: bool,
}

/// Service validating shorten requests and creating their mappings.
///
/// Every validation step runs before the first store mutation.
pub struct ShortenService {
    allocator: Arc<Allocator>,
}

impl ShortenService {
    /// Creates a new shorten service.
    pub fn new(allocator: Arc<Allocator>) -> Self {
        Self { allocator }
    }

    /// Shortens `long_url`, optionally under a custom alias and with an expiry.
    ///
    /// A blank `custom_alias` counts as absent. Without one, every call
    /// allocates a new code, even for a URL that was shortened before.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - URL is missing, malformed, or not http/https
    /// - Custom alias violates the charset or length rules
    /// - Expiration date does not match `YYYY-MM-DDTHH:MM:SSZ`
    ///
    /// Returns [`AppError::Conflict`] if the custom alias exists.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn shorten(
        &self,
        long_url: Option<&str>,
        custom_alias: Option<&str>,
        expiration_date: Option<&str>,
        base_url: &str,
    ) -> Result<ShortenedLink, AppError> {
        let long_url = validate_long_url(long_url)?;

        let custom_alias = custom_alias.filter(|alias| !alias.trim().is_empty());
        if let Some(alias) = custom_alias {
            Allocator::check_alias(alias)?;
        }

        let expiration_time = parse_expiration_date(expiration_date)?;

        let draft = MappingDraft::new(long_url.to_string(), expiration_time);
        let mapping = self.allocator.allocate(custom_alias, &draft).await?;

        let kind = if custom_alias.is_some() {
            "custom"
        } else {
            "generated"
        };
        metrics::counter!("shortener_links_created_total", "kind" => kind).increment(1);
        info!(
            "Created {} short code {} (expires: {:?})",
            kind, mapping.short_code, mapping.expiration_time
        );

        let short_url = build_short_url(base_url, &mapping.short_code);

        Ok(ShortenedLink {
            mapping,
            short_url,
            is_custom_alias: custom_alias.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockCounterRepository, MockMappingRepository, StoreError};

    const BASE_URL: &str = "https://sho.rt";

    fn service(mappings: MockMappingRepository, counters: MockCounterRepository) -> ShortenService {
        ShortenService::new(Arc::new(Allocator::new(
            Arc::new(mappings),
            Arc::new(counters),
        )))
    }

    fn untouched_store() -> ShortenService {
        let mut mappings = MockMappingRepository::new();
        let mut counters = MockCounterRepository::new();
        mappings.expect_put_if_absent().times(0);
        mappings.expect_put().times(0);
        counters.expect_ensure_exists().times(0);
        counters.expect_increment().times(0);
        service(mappings, counters)
    }

    #[tokio::test]
    async fn test_shorten_generated() {
        let mut mappings = MockMappingRepository::new();
        let mut counters = MockCounterRepository::new();

        counters.expect_ensure_exists().returning(|_| Ok(()));
        counters.expect_increment().returning(|_| Ok(62));
        mappings
            .expect_put_if_absent()
            .withf(|m| m.short_code == "10" && m.expiration_time.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let link = service(mappings, counters)
            .shorten(Some("https://example.com"), None, None, BASE_URL)
            .await
            .unwrap();

        assert_eq!(link.mapping.short_code, "10");
        assert_eq!(link.short_url, "https://sho.rt/r/10");
        assert!(!link.is_custom_alias);
    }

    #[tokio::test]
    async fn test_shorten_with_alias_and_expiration() {
        let mut mappings = MockMappingRepository::new();
        let mut counters = MockCounterRepository::new();

        counters.expect_increment().times(0);
        mappings
            .expect_put_if_absent()
            .withf(|m| m.short_code == "my-alias" && m.expiration_time == Some(1_577_836_800))
            .times(1)
            .returning(|_| Ok(()));
        mappings.expect_put().times(0);

        let link = service(mappings, counters)
            .shorten(
                Some("https://example.com"),
                Some("my-alias"),
                Some("2020-01-01T00:00:00Z"),
                BASE_URL,
            )
            .await
            .unwrap();

        assert_eq!(link.short_url, "https://sho.rt/r/my-alias");
        assert!(link.is_custom_alias);
    }

    #[tokio::test]
    async fn test_blank_alias_is_generated() {
        let mut mappings = MockMappingRepository::new();
        let mut counters = MockCounterRepository::new();

        counters.expect_ensure_exists().returning(|_| Ok(()));
        counters.expect_increment().times(1).returning(|_| Ok(1));
        mappings.expect_put_if_absent().returning(|_| Ok(()));

        let link = service(mappings, counters)
            .shorten(Some("https://example.com"), Some("  "), None, BASE_URL)
            .await
            .unwrap();

        assert!(!link.is_custom_alias);
        assert_eq!(link.mapping.short_code, "1");
    }

    #[tokio::test]
    async fn test_invalid_url_scheme_writes_nothing() {
        let result = untouched_store()
            .shorten(Some("ftp://x"), None, None, BASE_URL)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_url() {
        let result = untouched_store().shorten(None, None, None, BASE_URL).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_invalid_alias_writes_nothing() {
        let result = untouched_store()
            .shorten(Some("https://example.com"), Some("bad alias"), None, BASE_URL)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_invalid_expiration_writes_nothing() {
        let result = untouched_store()
            .shorten(
                Some("https://example.com"),
                Some("my-alias"),
                Some("next tuesday"),
                BASE_URL,
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_alias_taken_is_conflict() {
        let mut mappings = MockMappingRepository::new();
        mappings
            .expect_put_if_absent()
            .returning(|m| Err(StoreError::AlreadyExists(m.short_code.clone())));

        let result = service(mappings, MockCounterRepository::new())
            .shorten(Some("https://example.com"), Some("my-alias"), None, BASE_URL)
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }
}
