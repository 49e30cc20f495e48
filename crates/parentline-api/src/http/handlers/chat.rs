//! `POST /chat`: accepts either wire shape and answers in the same one.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use parentline_types::protocol::WireReply;

use super::parse_body;
use crate::state::AppState;

pub async fn chat(State(state): State<AppState>, body: Bytes) -> Json<WireReply> {
    let body = parse_body(&body);
    Json(state.relay.handle(&body).await.reply)
}
