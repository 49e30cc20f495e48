//! Liveness endpoints.

use axum::extract::{FromRequestParts, Request, State};
use axum::extract::ws::WebSocketUpgrade;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::ws;
use crate::state::AppState;

pub const LIVENESS_TEXT: &str = "Parentline conversation relay is running";

/// GET /
///
/// Plain-text liveness message. The avatar platform connects its WebSocket
/// to the root path, so an upgrade request is handed to the bridge instead.
pub async fn root(State(state): State<AppState>, request: Request) -> Response {
    if !ws::is_upgrade_request(request.headers()) {
        return LIVENESS_TEXT.into_response();
    }

    let (mut parts, _body) = request.into_parts();
    match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
        Ok(upgrade) => ws::upgrade(upgrade, state),
        Err(rejection) => rejection.into_response(),
    }
}

/// GET /ping
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    let now = Utc::now();
    Json(json!({
        "status": "ok",
        "timestamp": now.to_rfc3339(),
        "activeSessions": state.relay.sessions().len(),
        "uptimeSeconds": (now - state.started_at).num_seconds(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
