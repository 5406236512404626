//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::host_context::resolve_base_url;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com",
///   "custom_alias": "my-alias",                 // optional
///   "expiration_date": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "https://sho.rt/r/my-alias",
///   "custom_alias": "my-alias",
///   "expiration_date": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// Generated codes are returned as `short_code` instead of `custom_alias`.
///
/// # Errors
///
/// - 400 Bad Request for malformed JSON or invalid fields
/// - 409 Conflict if the custom alias is taken
/// - 500 Internal Server Error on store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let base_url = resolve_base_url(state.public_base_url.as_deref(), &headers)?;

    let link = state
        .shorten_service
        .shorten(
            payload.long_url.as_deref(),
            payload.custom_alias.as_deref(),
            payload.expiration_date.as_deref(),
            &base_url,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(link, payload.expiration_date)),
    ))
}
