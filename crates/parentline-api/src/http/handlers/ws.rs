//! WebSocket bridge for the avatar platform.
//!
//! The platform speaks `{category, kind, name, body}` envelopes. For each
//! `conversationRequest` the bridge re-POSTs the body to `/conversation`
//! through [`ConversationClient`] and answers with a `conversationResponse`
//! envelope that echoes `variables.Turn_Id`. Every other message is logged
//! and ignored.
//!
//! Requests on one socket are handled concurrently; replies are funneled
//! through a single writer task, so they may arrive out of request order.
//! The platform matches them up by turn id.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use parentline_core::reply::{is_canned, UPSTREAM_APOLOGY};
use parentline_infra::bridge::ConversationClient;
use parentline_types::envelope::{ConversationRequestBody, ConversationResponseBody, Envelope};

use crate::state::AppState;

/// Outbound envelopes buffered per connection before request tasks wait.
const REPLY_BUFFER: usize = 32;

/// GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state)
}

/// Finish an upgrade and hand the socket to the bridge.
pub fn upgrade(ws: WebSocketUpgrade, state: AppState) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Whether the request asks for `Upgrade: websocket`.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::now_v7();
    tracing::info!(%connection_id, "Avatar platform connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (reply_tx, mut reply_rx) = mpsc::channel::<Envelope>(REPLY_BUFFER);

    let writer = tokio::spawn(async move {
        while let Some(envelope) = reply_rx.recv().await {
            match serde_json::to_string(&envelope) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        // Client disconnected
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!("Failed to serialize envelope: {err}");
                }
            }
        }
    });

    while let Some(msg_result) = ws_receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let bridge = state.bridge.clone();
                let reply_tx = reply_tx.clone();
                tokio::spawn(async move {
                    if let Some(envelope) = process_message(text.as_str(), &bridge).await {
                        let _ = reply_tx.send(envelope).await;
                    }
                });
            }
            Ok(Message::Close(_)) => break,
            Err(err) => {
                tracing::debug!(%connection_id, "WebSocket receive error: {err}");
                break;
            }
            // Binary, ping, pong: handled by axum/tungstenite
            Ok(_) => {}
        }
    }

    drop(reply_tx);
    let _ = writer.await;
    tracing::info!(%connection_id, "Avatar platform disconnected");
}

/// Turn one inbound text frame into the envelope to send back, if any.
pub(crate) async fn process_message(text: &str, bridge: &ConversationClient) -> Option<Envelope> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("Unrecognized WebSocket message: {err}");
            return None;
        }
    };

    if !envelope.is_conversation_request() {
        tracing::debug!(name = %envelope.name, kind = %envelope.kind, "Ignoring platform message");
        return None;
    }

    let body: ConversationRequestBody = match serde_json::from_value(envelope.body) {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!("Malformed conversationRequest body: {err}");
            return None;
        }
    };

    let turn_id = body.turn_id().cloned();
    let response = match bridge.converse(&body.to_vendor_request()).await {
        Ok(reply) => {
            tracing::debug!(?turn_id, "Conversation callback answered");
            let fallback = is_canned(&reply.answer);
            ConversationResponseBody::answering(&body, &reply.answer, fallback)
        }
        Err(err) => {
            tracing::error!(?turn_id, endpoint = %bridge.endpoint(), "Conversation callback failed: {err}");
            ConversationResponseBody::answering(&body, UPSTREAM_APOLOGY, true)
        }
    };

    match Envelope::conversation_response(&response) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::error!(?turn_id, "Failed to encode conversationResponse: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use parentline_core::llm::box_provider::BoxLlmProvider;
    use parentline_core::reply::INIT_GREETING;
    use serde_json::json;

    use crate::http::router::build_router;
    use crate::test_support::{test_config, ScriptedProvider};

    fn conversation_request(text: &str, kind: Option<&str>) -> String {
        let mut body = json!({
            "input": {"text": text},
            "personaId": 42,
            "variables": {"Turn_Id": "turn-1"},
        });
        if let Some(kind) = kind {
            body["optionalArgs"] = json!({"kind": kind});
        }
        json!({
            "category": "scene",
            "kind": "event",
            "name": "conversationRequest",
            "body": body,
        })
        .to_string()
    }

    /// Serve a router on an ephemeral port whose bridge posts back to itself.
    async fn spawn_relay(provider: ScriptedProvider) -> ConversationClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(
            BoxLlmProvider::new(provider),
            &test_config(&format!("http://{addr}")),
        );
        let bridge = state.bridge.clone();

        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        bridge
    }

    #[test]
    fn test_is_upgrade_request() {
        let mut headers = HeaderMap::new();
        assert!(!is_upgrade_request(&headers));

        headers.insert(header::UPGRADE, HeaderValue::from_static("WebSocket"));
        assert!(is_upgrade_request(&headers));

        headers.insert(header::UPGRADE, HeaderValue::from_static("h2c"));
        assert!(!is_upgrade_request(&headers));
    }

    #[tokio::test]
    async fn test_non_json_message_is_ignored() {
        let bridge = ConversationClient::new("http://127.0.0.1:9");
        assert!(process_message("hello?", &bridge).await.is_none());
    }

    #[tokio::test]
    async fn test_other_envelope_names_are_ignored() {
        let bridge = ConversationClient::new("http://127.0.0.1:9");
        let text = json!({
            "category": "scene",
            "kind": "event",
            "name": "sceneStarted",
            "body": {}
        })
        .to_string();
        assert!(process_message(&text, &bridge).await.is_none());
    }

    #[tokio::test]
    async fn test_callback_failure_sends_apology_envelope() {
        let bridge = ConversationClient::new("http://127.0.0.1:9");
        let envelope = process_message(&conversation_request("Hi", None), &bridge)
            .await
            .unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["name"], "conversationResponse");
        assert_eq!(json["body"]["output"]["text"], UPSTREAM_APOLOGY);
        assert_eq!(json["body"]["response"]["answer"], UPSTREAM_APOLOGY);
        assert_eq!(json["body"]["fallback"], true);
        assert_eq!(json["body"]["variables"]["Turn_Id"], "turn-1");
    }

    #[tokio::test]
    async fn test_round_trip_through_conversation_endpoint() {
        let bridge =
            spawn_relay(ScriptedProvider::with_replies(vec![Ok("Sam had a good day.")])).await;

        let envelope = process_message(&conversation_request("How was today?", None), &bridge)
            .await
            .unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["category"], "scene");
        assert_eq!(json["kind"], "request");
        assert_eq!(json["body"]["personaId"], 42);
        assert_eq!(json["body"]["input"]["text"], "How was today?");
        assert_eq!(json["body"]["output"]["text"], "Sam had a good day.");
        assert_eq!(json["body"]["response"]["answerAvailable"], true);
        assert_eq!(json["body"]["fallback"], false);
        assert_eq!(json["body"]["variables"]["Turn_Id"], "turn-1");
    }

    #[tokio::test]
    async fn test_null_optionals_still_get_a_reply() {
        let bridge = spawn_relay(ScriptedProvider::with_replies(vec![Ok("We are doing well.")])).await;
        let text = json!({
            "category": "scene",
            "kind": "event",
            "name": "conversationRequest",
            "body": {
                "input": {"text": "How are you?"},
                "personaId": 42,
                "variables": null,
                "optionalArgs": null
            }
        })
        .to_string();

        let envelope = process_message(&text, &bridge).await.unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["body"]["output"]["text"], "We are doing well.");
        assert_eq!(json["body"]["fallback"], false);
        assert_eq!(json["body"]["variables"], json!({}));
    }

    #[tokio::test]
    async fn test_init_over_bridge_gets_greeting() {
        let provider = ScriptedProvider::default();
        let bridge = spawn_relay(provider.clone()).await;

        let envelope = process_message(&conversation_request("", Some("init")), &bridge)
            .await
            .unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["body"]["output"]["text"], INIT_GREETING);
        assert_eq!(json["body"]["fallback"], false);
        assert_eq!(provider.calls(), 0);
    }
}
