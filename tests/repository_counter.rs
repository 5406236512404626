mod common;

use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use url_shortener::domain::repositories::{CounterRepository, URL_COUNTER_ID};
use url_shortener::infrastructure::persistence::{PgCounterRepository, RetryPolicy};

fn repo(pool: PgPool) -> PgCounterRepository {
    PgCounterRepository::new(Arc::new(pool), RetryPolicy::none())
}

#[sqlx::test]
async fn test_ensure_exists_creates_at_zero(pool: PgPool) {
    let repo = repo(pool.clone());

    repo.ensure_exists(URL_COUNTER_ID).await.unwrap();

    assert_eq!(common::counter_value(&pool, URL_COUNTER_ID).await, Some(0));
}

#[sqlx::test]
async fn test_ensure_exists_is_idempotent(pool: PgPool) {
    let repo = repo(pool.clone());

    repo.ensure_exists(URL_COUNTER_ID).await.unwrap();
    repo.increment(URL_COUNTER_ID).await.unwrap();
    repo.ensure_exists(URL_COUNTER_ID).await.unwrap();

    // The second call must not reset the value
    assert_eq!(common::counter_value(&pool, URL_COUNTER_ID).await, Some(1));
}

#[sqlx::test]
async fn test_increment_returns_new_value(pool: PgPool) {
    let repo = repo(pool);
    repo.ensure_exists(URL_COUNTER_ID).await.unwrap();

    assert_eq!(repo.increment(URL_COUNTER_ID).await.unwrap(), 1);
    assert_eq!(repo.increment(URL_COUNTER_ID).await.unwrap(), 2);
    assert_eq!(repo.increment(URL_COUNTER_ID).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_counters_are_independent(pool: PgPool) {
    let repo = repo(pool);
    repo.ensure_exists("first").await.unwrap();
    repo.ensure_exists("second").await.unwrap();

    repo.increment("first").await.unwrap();
    repo.increment("first").await.unwrap();

    assert_eq!(repo.increment("second").await.unwrap(), 1);
}

#[sqlx::test]
async fn test_increment_missing_counter_fails(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.increment("never-created").await.is_err());
}

#[sqlx::test]
async fn test_concurrent_increments_are_unique(pool: PgPool) {
    let repo = Arc::new(repo(pool.clone()));
    repo.ensure_exists(URL_COUNTER_ID).await.unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment(URL_COUNTER_ID).await })
        })
        .collect();

    let mut values = HashSet::new();
    for handle in handles {
        values.insert(handle.await.unwrap().unwrap());
    }

    assert_eq!(values, (1..=50).collect::<HashSet<u64>>());
    assert_eq!(common::counter_value(&pool, URL_COUNTER_ID).await, Some(50));
}
