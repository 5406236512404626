//! Application error type and its HTTP mapping.
//!
//! Every failure the services can report is funnelled into [`AppError`]. The
//! variant decides the status code, the `message`/`details` pair is rendered as
//! the JSON error body:
//!
//! ```json
//! { "error": { "code": "conflict", "message": "...", "details": { } } }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::AllocationError;
use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or invalid input. Nothing was written.
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// The short code is already mapped.
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// The short code existed but its expiration time has passed.
    #[error("{message}")]
    Expired { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::Expired {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Expired { .. } => StatusCode::GONE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Expired { message, details } => ("expired", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Store operation failed: {}", e);
        // Backend messages are not exposed to callers.
        AppError::internal("An unexpected error occurred", json!({}))
    }
}

impl From<AllocationError> for AppError {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::InvalidAlias { reason, alias } => AppError::bad_request(
                format!("Invalid custom alias. {}", reason),
                json!({ "custom_alias": alias }),
            ),
            AllocationError::AliasTaken(alias) => AppError::conflict(
                "Custom alias already taken",
                json!({ "custom_alias": alias }),
            ),
            AllocationError::AllocationFailed(source) => {
                tracing::error!("Short code allocation failed: {}", source);
                AppError::internal("An unexpected error occurred", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();

        AppError::bad_request(
            "Request validation failed",
            json!({ "fields": fields, "errors": errors }),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("x", json!({})).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::expired("x", json!({})).status_code(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::internal("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_hides_backend_message() {
        let err: AppError = StoreError::Backend("password authentication failed".into()).into();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(!err.to_string().contains("password"));
    }

    #[test]
    fn test_allocation_error_mapping() {
        let taken: AppError = AllocationError::AliasTaken("my-alias".into()).into();
        assert!(matches!(taken, AppError::Conflict { .. }));
        assert_eq!(taken.to_error_info().details["custom_alias"], "my-alias");

        let invalid: AppError = AllocationError::InvalidAlias {
            alias: "bad alias".into(),
            reason: "Only letters, digits, hyphens, and underscores allowed".into(),
        }
        .into();
        assert!(matches!(invalid, AppError::Validation { .. }));

        let failed: AppError =
            AllocationError::AllocationFailed(StoreError::Unavailable("timeout".into())).into();
        assert!(matches!(failed, AppError::Internal { .. }));
    }

    #[test]
    fn test_error_info_codes() {
        assert_eq!(
            AppError::expired("gone", json!({})).to_error_info().code,
            "expired"
        );
        assert_eq!(
            AppError::conflict("dup", json!({})).to_error_info().code,
            "conflict"
        );
    }
}
