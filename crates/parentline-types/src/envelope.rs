//! Avatar platform message envelope.
//!
//! Every WebSocket frame is a `{category, kind, name, body}` object. The
//! relay only acts on `name == "conversationRequest"` and answers with a
//! `conversationResponse` envelope. There is no schema versioning; `body`
//! is kept as raw JSON until its `name` is known.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::{
    deserialize_or_default, OptionalArgs, TextField, VendorConversationRequest, VendorReply,
};

pub const CATEGORY_SCENE: &str = "scene";
pub const KIND_REQUEST: &str = "request";
pub const CONVERSATION_REQUEST: &str = "conversationRequest";
pub const CONVERSATION_RESPONSE: &str = "conversationResponse";

/// Variable the platform uses to correlate a reply with its request.
pub const TURN_ID_VARIABLE: &str = "Turn_Id";

/// Generic platform message wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub category: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub body: Value,
}

impl Envelope {
    pub fn is_conversation_request(&self) -> bool {
        self.name == CONVERSATION_REQUEST
    }

    /// Build the outbound `conversationResponse` envelope.
    pub fn conversation_response(body: &ConversationResponseBody) -> serde_json::Result<Self> {
        Ok(Self {
            category: CATEGORY_SCENE.to_string(),
            kind: KIND_REQUEST.to_string(),
            name: CONVERSATION_RESPONSE.to_string(),
            body: serde_json::to_value(body)?,
        })
    }
}

/// Body of an inbound `conversationRequest`.
///
/// Only `input.text` is required; `null` or mistyped `variables` and
/// `optionalArgs` read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequestBody {
    pub input: TextField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub variables: Map<String, Value>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub optional_args: OptionalArgs,
}

impl ConversationRequestBody {
    /// `variables.Turn_Id`, if the platform sent one.
    pub fn turn_id(&self) -> Option<&Value> {
        self.variables.get(TURN_ID_VARIABLE)
    }

    /// The HTTP `/conversation` request the bridge forwards for this body.
    pub fn to_vendor_request(&self) -> VendorConversationRequest {
        let persona_id = match &self.persona_id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        VendorConversationRequest {
            input: self.input.clone(),
            persona_id,
            optional_args: self.optional_args.clone(),
            variables: self.variables.clone(),
        }
    }
}

/// Body of an outbound `conversationResponse`.
///
/// `output.text` and `response.answer` carry the same string; different
/// platform versions read one or the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<Value>,
    pub input: TextField,
    pub output: TextField,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default)]
    pub fallback: bool,
    pub response: VendorReply,
}

impl ConversationResponseBody {
    /// Wrap an answer for `request`, echoing its turn id.
    pub fn answering(request: &ConversationRequestBody, answer: &str, fallback: bool) -> Self {
        let mut variables = Map::new();
        if let Some(turn_id) = request.turn_id() {
            variables.insert(TURN_ID_VARIABLE.to_string(), turn_id.clone());
        }

        Self {
            persona_id: request.persona_id.clone(),
            input: request.input.clone(),
            output: TextField::new(answer),
            variables,
            fallback,
            response: VendorReply {
                answer: answer.to_string(),
                answer_available: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inbound() -> Envelope {
        serde_json::from_value(json!({
            "category": "scene",
            "kind": "event",
            "name": "conversationRequest",
            "body": {
                "input": {"text": "Tell me about your son"},
                "personaId": 1,
                "variables": {"Turn_Id": "turn-9"},
                "optionalArgs": {"kind": "chat", "speakResults": true}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_conversation_request() {
        let envelope = inbound();
        assert!(envelope.is_conversation_request());

        let body: ConversationRequestBody = serde_json::from_value(envelope.body).unwrap();
        assert_eq!(body.input.text, "Tell me about your son");
        assert_eq!(body.turn_id(), Some(&json!("turn-9")));
        assert_eq!(body.optional_args.speak_results, Some(true));
    }

    #[test]
    fn test_to_vendor_request_stringifies_persona() {
        let body: ConversationRequestBody = serde_json::from_value(inbound().body).unwrap();
        let request = body.to_vendor_request();
        assert_eq!(request.persona_id.as_deref(), Some("1"));
        assert_eq!(request.input.text, "Tell me about your son");
        assert_eq!(request.variables.get(TURN_ID_VARIABLE), Some(&json!("turn-9")));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["personaId"], "1");
        assert_eq!(json["optionalArgs"]["kind"], "chat");
    }

    #[test]
    fn test_response_echoes_turn_id_and_duplicates_answer() {
        let body: ConversationRequestBody = serde_json::from_value(inbound().body).unwrap();
        let envelope = Envelope::conversation_response(&ConversationResponseBody::answering(
            &body,
            "He loves trains.",
            false,
        ))
        .unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["category"], "scene");
        assert_eq!(json["kind"], "request");
        assert_eq!(json["name"], "conversationResponse");
        assert_eq!(json["body"]["variables"]["Turn_Id"], "turn-9");
        assert_eq!(json["body"]["personaId"], 1);
        assert_eq!(json["body"]["output"]["text"], "He loves trains.");
        assert_eq!(json["body"]["response"]["answer"], "He loves trains.");
        assert_eq!(json["body"]["response"]["answerAvailable"], true);
        assert_eq!(json["body"]["fallback"], false);
    }

    #[test]
    fn test_request_body_tolerates_null_optionals() {
        let envelope: Envelope = serde_json::from_value(json!({
            "category": "scene",
            "kind": "event",
            "name": "conversationRequest",
            "body": {
                "input": {"text": "Hello"},
                "personaId": null,
                "variables": null,
                "optionalArgs": null
            }
        }))
        .unwrap();

        let body: ConversationRequestBody = serde_json::from_value(envelope.body).unwrap();
        assert_eq!(body.input.text, "Hello");
        assert!(body.variables.is_empty());
        assert_eq!(body.optional_args, OptionalArgs::default());
        assert_eq!(body.to_vendor_request().persona_id, None);
    }

    #[test]
    fn test_request_body_mistyped_speak_results() {
        let body: ConversationRequestBody = serde_json::from_value(json!({
            "input": {"text": "Hello"},
            "variables": {"Turn_Id": 3},
            "optionalArgs": {"kind": "chat", "speakResults": "false"}
        }))
        .unwrap();
        assert_eq!(body.optional_args.speak_results, Some(false));
        assert_eq!(body.turn_id(), Some(&json!(3)));
    }

    #[test]
    fn test_response_without_turn_id_has_empty_variables() {
        let body = ConversationRequestBody {
            input: TextField::new("hi"),
            persona_id: None,
            variables: Map::new(),
            optional_args: OptionalArgs::default(),
        };
        let response = ConversationResponseBody::answering(&body, "hello", true);
        assert!(response.variables.is_empty());
        assert!(response.fallback);
    }
}
