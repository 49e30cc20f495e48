//! Session inspection and reset.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;

use parentline_types::protocol::{ResetRequest, ResetResponse};
use parentline_types::session::SessionSummary;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /reset
///
/// Deletes the session named by `sessionId` (or `personaId`, or
/// `"default"`). Succeeds whether or not the session existed. Key fields
/// decode leniently, so only a body that is not a JSON object falls back
/// to `"default"`.
pub async fn reset_session(State(state): State<AppState>, body: Bytes) -> Json<ResetResponse> {
    let request: ResetRequest = serde_json::from_slice(&body).unwrap_or_else(|err| {
        if !body.is_empty() {
            tracing::debug!("Reset body is not a JSON object, resetting default: {err}");
        }
        ResetRequest::default()
    });
    Json(state.relay.reset(request.session_key()))
}

/// GET /session/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    state
        .relay
        .sessions()
        .summary(&session_id)
        .map(Json)
        .ok_or(AppError::SessionNotFound(session_id))
}
