//! API route configuration.

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All service routes. None require authentication.
///
/// # Endpoints
///
/// - `POST /urls`              - Create a short link
/// - `GET  /r/{short_code}`    - Redirect to the long URL
/// - `GET  /health`            - Store and cache health
pub fn shortener_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(shorten_handler))
        .route("/r/{short_code}", get(redirect_handler))
        .route("/health", get(health_handler))
}
