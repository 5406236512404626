//! Classification of SQLx errors into store outcomes.

use crate::domain::repositories::StoreError;

/// Maps an SQLx error onto [`StoreError`].
///
/// Only a pool acquire timeout is reported as retryable: the statement was
/// never sent. Anything failing after that point may or may not have been
/// applied and is reported as [`StoreError::Backend`].
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::PoolTimedOut => StoreError::Unavailable(e.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::AlreadyExists(db.constraint().unwrap_or_default().to_string())
        }
        _ => StoreError::Backend(e.to_string()),
    }
}
