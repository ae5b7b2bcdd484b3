pub mod handlers;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response body.
///
/// Every failure surfaces in this shape:
///
/// ```json
/// {
///   "timestamp": "2026-03-01T12:00:00Z",
///   "error": "User not found"
/// }
/// ```
///
/// Validation failures additionally carry a `details` object enumerating the
/// failing fields.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// When the failure was translated (RFC 3339)
    pub timestamp: DateTime<Utc>,
    /// Human-readable error message
    pub error: String,
    /// Optional per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            error: error.into(),
            details: Some(details),
        }
    }
}

/// Application error type that converts into HTTP responses.
///
/// Domain crates map their own error enums into this one; the `IntoResponse`
/// impl below is the single place where failures become wire responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::JsonExtractorRejection(e) => {
                // Missing or mistyped fields surface as 400 like every other
                // request-shape problem, not axum's default 422.
                tracing::warn!("JSON extraction error: {:?}", e);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(e.body_text()))
            }
            AppError::ValidationError(e) => {
                tracing::info!("Validation error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(
                        "Validation failed for the provided input",
                        validation_details(&e),
                    ),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg))
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new(msg))
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(msg))
            }
            AppError::InternalServerError(msg) => {
                // The message is logged, never sent: clients get a
                // non-committal body for unexpected failures.
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An unexpected error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Flatten validator output into a `field -> [messages]` object.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<serde_json::Value> = errs
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}
