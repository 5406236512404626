//! Mapping entity representing one short code → target URL record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted short code mapping.
///
/// Field names are shared by every persistence backend and the cache
/// encoding, so they must not be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub short_code: String,
    pub long_url: String,
    pub creation_time: DateTime<Utc>,
    /// Absolute expiry in epoch seconds. `None` (or a legacy `0`) never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        short_code: String,
        long_url: String,
        creation_time: DateTime<Utc>,
        expiration_time: Option<i64>,
    ) -> Self {
        Self {
            short_code,
            long_url,
            creation_time,
            expiration_time,
        }
    }

    /// Returns true if the mapping's expiration time lies before `now`.
    ///
    /// A mapping expiring exactly at `now` is still valid. Only an exact `0`
    /// is the legacy "never" marker; negative (pre-1970) times are in the past.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expiration_time {
            None | Some(0) => false,
            Some(expiration) => expiration < now,
        }
    }
}

/// Validated mapping data waiting for a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDraft {
    pub long_url: String,
    pub creation_time: DateTime<Utc>,
    pub expiration_time: Option<i64>,
}

impl MappingDraft {
    pub fn new(long_url: String, expiration_time: Option<i64>) -> Self {
        Self {
            long_url,
            creation_time: Utc::now(),
            expiration_time,
        }
    }

    /// Binds the draft to its allocated short code.
    pub fn with_code(&self, short_code: impl Into<String>) -> Mapping {
        Mapping::new(
            short_code.into(),
            self.long_url.clone(),
            self.creation_time,
            self.expiration_time,
        )
    }
}
