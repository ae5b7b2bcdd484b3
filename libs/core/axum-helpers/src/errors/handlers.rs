use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::ErrorResponse;

/// Fallback handler for routes that match nothing.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new("The requested resource was not found"));

    (StatusCode::NOT_FOUND, body).into_response()
}
