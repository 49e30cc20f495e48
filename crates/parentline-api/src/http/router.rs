//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS (any origin, method, header) and HTTP
//! tracing with a per-request id.

use axum::extract::Request;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %Uuid::now_v7(),
        )
    });

    Router::new()
        // Liveness, or the avatar platform's WebSocket upgrade.
        .route("/", get(handlers::health::root))
        .route("/ping", get(handlers::health::ping))
        .route("/ws", get(handlers::ws::ws_handler))
        // Conversation
        .route("/chat", post(handlers::chat::chat))
        .route("/conversation", post(handlers::conversation::conversation))
        // Sessions
        .route("/reset", post(handlers::session::reset_session))
        .route("/session/{session_id}", get(handlers::session::get_session))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}
