//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Receipt API                        │
//! │                                                                         │
//! │  Handler  →  Result<Json<T>, ApiError>                                  │
//! │                                                                         │
//! │  JsonRejection          ──► InvalidJson        400 {"error": ...}       │
//! │  Vec<ValidationError>   ──► Validation         400 {"errors": [...]}    │
//! │  store returned None    ──► ReceiptNotFound    404 {"error": ...}       │
//! │  DbError                ──► Storage            500 {"error": ...}       │
//! │  store health check     ──► Unavailable        503 {"error": ...}       │
//! │                                                                         │
//! │  Storage details are logged with tracing::error! and never sent.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use receipt_core::ValidationError;
use receipt_db::DbError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Message for a body that is not JSON or not shaped like a receipt.
pub const INVALID_JSON_MESSAGE: &str = "Please verify input. Invalid JSON format";

/// Message for an unknown receipt id.
pub const NOT_FOUND_MESSAGE: &str = "No receipt found for that ID";

/// Message for any storage failure.
pub const STORAGE_MESSAGE: &str = "Failed to store or read receipt";

/// Errors returned from handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded as a receipt submission.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// One or more fields failed validation.
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// No receipt with this id.
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// The store failed; the inner error is logged, not returned.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// The store is not answering.
    #[error("Service unavailable")]
    Unavailable,
}

/// Body of a single-message error.
///
/// ```json
/// { "error": "No receipt found for that ID" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a validation failure.
///
/// ```json
/// { "errors": [ { "field": "total", "message": "total has invalid format: ..." } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ReceiptNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::Validation(errors) => {
                tracing::info!(errors = errors.len(), "Rejected receipt");
                let body = ValidationErrorResponse {
                    errors: errors.iter().map(FieldError::from).collect(),
                };
                return (status, Json(body)).into_response();
            }
            ApiError::InvalidJson(detail) => {
                tracing::info!(%detail, "Rejected malformed body");
                INVALID_JSON_MESSAGE
            }
            ApiError::ReceiptNotFound(id) => {
                tracing::debug!(%id, "Receipt not found");
                NOT_FOUND_MESSAGE
            }
            ApiError::Storage(err) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Storage operation failed");
                STORAGE_MESSAGE
            }
            ApiError::Unavailable => "Service unavailable",
        };

        let body = ErrorResponse {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidJson("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Validation(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ReceiptNotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage(DbError::PoolExhausted).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_field_error_from_validation_error() {
        let err = ValidationError::InvalidFormat {
            field: "items[1].price".to_string(),
            reason: "expected a decimal number with exactly two decimal places".to_string(),
        };

        let field_error = FieldError::from(&err);
        assert_eq!(field_error.field, "items[1].price");
        assert_eq!(
            field_error.message,
            "items[1].price has invalid format: expected a decimal number with exactly two decimal places"
        );
    }
}
