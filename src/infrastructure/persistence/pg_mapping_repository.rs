//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_error::map_sqlx_error;
use super::retry::RetryPolicy;
use crate::domain::entities::Mapping;
use crate::domain::repositories::{MappingRepository, StoreError};

/// PostgreSQL repository for short code mappings.
///
/// Conditional creation relies on the `short_code` primary key: the insert
/// and the existence check happen in one statement.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
    retry: RetryPolicy,
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    short_code: String,
    long_url: String,
    creation_time: DateTime<Utc>,
    expiration_time: Option<i64>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping::new(
            row.short_code,
            row.long_url,
            row.creation_time,
            row.expiration_time,
        )
    }
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn put_if_absent(&self, mapping: &Mapping) -> Result<(), StoreError> {
        let pool = self.pool.as_ref();

        let inserted = self
            .retry
            .run("put_if_absent", move || async move {
                sqlx::query_scalar::<_, String>(
                    r#"
                    INSERT INTO url_mappings (short_code, long_url, creation_time, expiration_time)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (short_code) DO NOTHING
                    RETURNING short_code
                    "#,
                )
                .bind(&mapping.short_code)
                .bind(&mapping.long_url)
                .bind(mapping.creation_time)
                .bind(mapping.expiration_time)
                .fetch_optional(pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        match inserted {
            Some(_) => Ok(()),
            None => Err(StoreError::AlreadyExists(mapping.short_code.clone())),
        }
    }

    async fn put(&self, mapping: &Mapping) -> Result<(), StoreError> {
        let pool = self.pool.as_ref();

        self.retry
            .run("put", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO url_mappings (short_code, long_url, creation_time, expiration_time)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (short_code) DO UPDATE
                    SET long_url = EXCLUDED.long_url,
                        creation_time = EXCLUDED.creation_time,
                        expiration_time = EXCLUDED.expiration_time
                    "#,
                )
                .bind(&mapping.short_code)
                .bind(&mapping.long_url)
                .bind(mapping.creation_time)
                .bind(mapping.expiration_time)
                .execute(pool)
                .await
                .map(|_| ())
                .map_err(map_sqlx_error)
            })
            .await
    }

    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError> {
        let pool = self.pool.as_ref();

        let row = self
            .retry
            .run("get", move || async move {
                sqlx::query_as::<_, MappingRow>(
                    r#"
                    SELECT short_code, long_url, creation_time, expiration_time
                    FROM url_mappings
                    WHERE short_code = $1
                    "#,
                )
                .bind(short_code)
                .fetch_optional(pool)
                .await
                .map_err(map_sqlx_error)
            })
            .await?;

        Ok(row.map(Mapping::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
