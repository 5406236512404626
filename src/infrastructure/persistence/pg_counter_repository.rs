//! PostgreSQL implementation of the counter repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_error::map_sqlx_error;
use super::retry::RetryPolicy;
use crate::domain::repositories::{CounterRepository, StoreError};

/// PostgreSQL repository for code counters.
///
/// Increments are a single `UPDATE … RETURNING`, so the row lock serializes
/// concurrent callers and each observes its own post-increment value.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
    retry: RetryPolicy,
}

impl PgCounterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn ensure_exists(&self, counter_id: &str) -> Result<(), StoreError> {
        let pool = self.pool.as_ref();

        self.retry
            .run("ensure_counter", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO counters (counter_id, value)
                    VALUES ($1, 0)
                    ON CONFLICT (counter_id) DO NOTHING
                    "#,
                )
                .bind(counter_id)
                .execute(pool)
                .await
                .map(|_| ())
                .map_err(map_sqlx_error)
            })
            .await
    }

    async fn increment(&self, counter_id: &str) -> Result<u64, StoreError> {
        let pool = self.pool.as_ref();

        let value = self
            .retry
            .run("increment_counter", move || async move {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE counters
                    SET value = value + 1
                    WHERE counter_id = $1
                    RETURNING value
                    "#,
                )
                .bind(counter_id)
                .fetch_optional(pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?
            .ok_or_else(|| StoreError::Backend(format!("counter {} does not exist", counter_id)))?;

        u64::try_from(value)
            .map_err(|_| StoreError::Backend(format!("counter {} is negative", counter_id)))
    }
}
