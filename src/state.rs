//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{Allocator, RedirectService, ShortenService};
use crate::domain::repositories::{CounterRepository, MappingRepository};
use crate::infrastructure::cache::CacheService;

/// Handles to the services and stores. Cheap to clone.
///
/// Holds no per-request mutable state: everything shared between requests
/// lives in the stores.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub mappings: Arc<dyn MappingRepository>,
    pub cache: Arc<dyn CacheService>,
    /// Base for returned short URLs. Falls back to the `Host` header when unset.
    pub public_base_url: Option<String>,
}

impl AppState {
    /// Wires the services over the given stores.
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        counters: Arc<dyn CounterRepository>,
        cache: Arc<dyn CacheService>,
        public_base_url: Option<String>,
    ) -> Self {
        let allocator = Arc::new(Allocator::new(mappings.clone(), counters));

        Self {
            shorten_service: Arc::new(ShortenService::new(allocator)),
            redirect_service: Arc::new(RedirectService::new(mappings.clone(), cache.clone())),
            mappings,
            cache,
            public_base_url,
        }
    }
}
