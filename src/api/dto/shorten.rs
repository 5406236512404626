//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenedLink;

/// Request to shorten a URL.
///
/// `long_url` is optional at the serde level so a missing field is reported
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (must be http/https).
    #[validate(length(max = 2048, message = "URL too long"))]
    pub long_url: Option<String>,

    /// Optional caller-chosen short code.
    #[validate(length(max = 64, message = "Custom alias too long"))]
    pub custom_alias: Option<String>,

    /// Optional expiry as `YYYY-MM-DDTHH:MM:SSZ` (UTC).
    pub expiration_date: Option<String>,
}

/// Response for a created short link.
///
/// `short_code` is present only for generated codes, `custom_alias` only when
/// one was supplied.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl ShortenResponse {
    /// Builds the response, echoing the expiration date as submitted.
    pub fn new(link: ShortenedLink, expiration_date: Option<String>) -> Self {
        let ShortenedLink {
            mapping,
            short_url,
            is_custom_alias,
        } = link;

        let (short_code, custom_alias) = if is_custom_alias {
            (None, Some(mapping.short_code))
        } else {
            (Some(mapping.short_code), None)
        };

        Self {
            short_url,
            short_code,
            custom_alias,
            expiration_date: expiration_date.filter(|d| !d.is_empty()),
        }
    }
}
