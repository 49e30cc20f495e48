//! `POST /conversation`: the avatar platform's endpoint.
//!
//! Always answers `{answer, answerAvailable}`. An `optionalArgs.kind` of
//! `"init"` gets the fixed greeting without touching the session store.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use parentline_types::protocol::WireReply;

use super::parse_body;
use crate::state::AppState;

pub async fn conversation(State(state): State<AppState>, body: Bytes) -> Json<WireReply> {
    let body = parse_body(&body);
    Json(state.relay.handle_conversation(&body).await.reply)
}
