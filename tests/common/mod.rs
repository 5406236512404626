#![allow(dead_code)]

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use url_shortener::domain::entities::Mapping;
use url_shortener::domain::repositories::MappingRepository;
use url_shortener::infrastructure::cache::NullCache;
use url_shortener::infrastructure::persistence::{
    MemoryStore, PgCounterRepository, PgMappingRepository, RetryPolicy,
};
use url_shortener::state::AppState;

pub const TEST_BASE_URL: &str = "https://sho.rt";

pub async fn create_test_mapping(
    pool: &PgPool,
    code: &str,
    url: &str,
    expiration_time: Option<i64>,
) {
    sqlx::query(
        "INSERT INTO url_mappings (short_code, long_url, creation_time, expiration_time) VALUES ($1, $2, NOW(), $3)",
    )
    .bind(code)
    .bind(url)
    .bind(expiration_time)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_mappings(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn counter_value(pool: &PgPool, counter_id: &str) -> Option<i64> {
    sqlx::query_scalar("SELECT value FROM counters WHERE counter_id = $1")
        .bind(counter_id)
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with_base(pool, Some(TEST_BASE_URL))
}

pub fn create_test_state_with_base(pool: PgPool, public_base_url: Option<&str>) -> AppState {
    let pool = Arc::new(pool);

    let mappings = Arc::new(PgMappingRepository::new(pool.clone(), RetryPolicy::none()));
    let counters = Arc::new(PgCounterRepository::new(pool, RetryPolicy::none()));

    AppState::new(
        mappings,
        counters,
        Arc::new(NullCache::new()),
        public_base_url.map(str::to_string),
    )
}

/// State over a fresh in-memory store, returned alongside it for inspection.
pub fn create_memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let state = AppState::new(
        store.clone(),
        store.clone(),
        Arc::new(NullCache::new()),
        Some(TEST_BASE_URL.to_string()),
    );

    (state, store)
}

pub async fn seed_memory_mapping(
    store: &MemoryStore,
    code: &str,
    url: &str,
    expiration_time: Option<i64>,
) {
    let mapping = Mapping::new(code.to_string(), url.to_string(), Utc::now(), expiration_time);
    store.put(&mapping).await.unwrap();
}
