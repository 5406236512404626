//! Public base URL resolution for building short URLs.

use crate::AppError;
use axum::http::{HeaderMap, header};

/// Resolves the base URL short links are published under.
///
/// A configured base (`PUBLIC_BASE_URL`) always wins. Otherwise the `Host`
/// header is used verbatim, port included, behind an `https://` scheme.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no base is configured and the `Host`
/// header is missing or not valid UTF-8.
pub fn resolve_base_url(configured: Option<&str>, headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(base) = configured {
        return Ok(base.trim_end_matches('/').to_string());
    }

    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?;

    if host.is_empty() {
        return Err(AppError::bad_request(
            "Missing Host header",
            serde_json::json!({}),
        ));
    }

    Ok(format!("https://{}", host))
}

/// Builds the absolute short URL for a code under `base_url`.
pub fn build_short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/r/{}", base_url.trim_end_matches('/'), short_code)
}
