//! Input validation for shorten requests.
//!
//! All checks here run before any store mutation.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Maximum length of a custom alias.
pub const MAX_ALIAS_LENGTH: usize = 64;

/// Maximum accepted length of a long URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Accepted `expiration_date` layout (always UTC).
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Compiled regex for custom alias charset validation.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias regex is valid"));

/// Validates the URL to be shortened.
///
/// # Rules
///
/// - Must be present and non-empty
/// - Must parse as an absolute URL
/// - Scheme must be `http` or `https`
///
/// Returns the URL exactly as submitted.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_long_url(long_url: Option<&str>) -> Result<&str, AppError> {
    let long_url = match long_url {
        Some(url) if !url.trim().is_empty() => url,
        _ => {
            return Err(AppError::bad_request(
                "Missing \"long_url\" in request body",
                json!({}),
            ));
        }
    };

    if long_url.len() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            format!("URL too long. Maximum length is {} characters", MAX_URL_LENGTH),
            json!({ "provided_length": long_url.len() }),
        ));
    }

    let parsed = Url::parse(long_url).map_err(|e| {
        AppError::bad_request(
            "Invalid URL. Must start with http:// or https://",
            json!({ "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Invalid URL. Must start with http:// or https://",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(long_url)
}

/// Checks a custom alias against the charset and length rules.
///
/// Returns the human-readable reason on failure.
pub fn validate_custom_alias(alias: &str) -> Result<(), String> {
    if !ALIAS_REGEX.is_match(alias) {
        return Err("Only letters, digits, hyphens, and underscores allowed".to_string());
    }

    if alias.len() > MAX_ALIAS_LENGTH {
        return Err(format!(
            "Maximum length is {} characters",
            MAX_ALIAS_LENGTH
        ));
    }

    Ok(())
}

/// Parses an optional `YYYY-MM-DDTHH:MM:SSZ` timestamp into epoch seconds.
///
/// An absent or empty value means no expiration.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the value does not match the format,
/// or names the epoch itself.
pub fn parse_expiration_date(expiration_date: Option<&str>) -> Result<Option<i64>, AppError> {
    let Some(raw) = expiration_date.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let parsed = NaiveDateTime::parse_from_str(raw, EXPIRATION_FORMAT).map_err(|e| {
        AppError::bad_request(
            "Invalid expiration date.",
            json!({ "expiration_date": raw, "expected_format": "YYYY-MM-DDTHH:MM:SSZ", "reason": e.to_string() }),
        )
    })?;

    let timestamp = parsed.and_utc().timestamp();

    // A stored 0 reads back as "never expires".
    if timestamp == 0 {
        return Err(AppError::bad_request(
            "Invalid expiration date.",
            json!({ "expiration_date": raw, "reason": "1970-01-01T00:00:00Z is reserved" }),
        ));
    }

    Ok(Some(timestamp))
}
