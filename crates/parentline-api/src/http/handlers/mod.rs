//! Request handlers.
//!
//! Conversation handlers take the raw body instead of `Json<T>`: a body that
//! is not JSON, or JSON of the wrong shape, still gets a 200 with a canned
//! apology rather than axum's 4xx rejection.

pub mod chat;
pub mod conversation;
pub mod health;
pub mod session;
pub mod ws;

use axum::body::Bytes;
use serde_json::Value;

/// Parse a request body, mapping empty or invalid JSON to `Value::Null`.
fn parse_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|err| {
        tracing::debug!("Request body is not JSON: {err}");
        Value::Null
    })
}
