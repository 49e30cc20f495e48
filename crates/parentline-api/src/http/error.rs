//! Application error type mapping to HTTP status codes.
//!
//! Relay failures never reach this type: they are answered with canned
//! replies and a 200. Only lookups that can miss produce an error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// `GET /session/{id}` for a key with no live session.
    SessionNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::SessionNotFound(key) => {
                tracing::debug!(session_key = %key, "Session lookup missed");
                (StatusCode::NOT_FOUND, "Session not found")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
