//! HTTP wire shapes and inbound request decoding.
//!
//! Two request shapes arrive on the HTTP surface:
//!
//! - **Generic:** `{ "text": "...", "sessionId": "..." }`, answered with
//!   `{ "output": { "text": "..." } }`.
//! - **Vendor:** `{ "input": { "text": "..." }, "personaId": ..., "optionalArgs": {...} }`,
//!   answered with `{ "answer": "...", "answerAvailable": true }`.
//!
//! [`InboundRequest::decode`] turns a raw JSON body into one of the two
//! variants, or an [`RelayError::UnrecognizedRequest`] when neither fits.
//! The vendor shape wins when a body carries both.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RelayError;
use crate::session::DEFAULT_SESSION_KEY;

/// `{ "text": "..." }` wrapper used by `input` and `output` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextField {
    pub text: String,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Vendor `optionalArgs` block. Unknown keys are ignored, and a field of
/// the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalArgs {
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub speak_results: Option<bool>,
}

impl OptionalArgs {
    /// The platform's welcome request (`kind == "init"`).
    pub fn is_init(&self) -> bool {
        self.kind.as_deref() == Some("init")
    }
}

/// Generic request: `{text, sessionId?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericChatRequest {
    pub text: String,
    #[serde(
        default,
        deserialize_with = "deserialize_session_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
}

/// Vendor request: `{input:{text}, personaId?, optionalArgs?, variables?}`.
///
/// Only `input.text` is required. `null` or a mistyped optional field
/// decodes as its default instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorConversationRequest {
    pub input: TextField,
    #[serde(
        default,
        deserialize_with = "deserialize_session_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub persona_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub optional_args: OptionalArgs,
    #[serde(
        default,
        deserialize_with = "deserialize_or_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub variables: Map<String, Value>,
}

/// Which wire shape a request arrived in; decides the reply shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireShape {
    Generic,
    Vendor,
}

/// A decoded inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundRequest {
    Generic(GenericChatRequest),
    Vendor(VendorConversationRequest),
}

impl InboundRequest {
    /// Decode a raw JSON body by structure.
    ///
    /// `input.text` (string) selects the vendor shape; a top-level string
    /// `text` selects the generic shape.
    pub fn decode(body: &Value) -> Result<Self, RelayError> {
        let object = body
            .as_object()
            .ok_or_else(|| RelayError::UnrecognizedRequest("body is not a JSON object".into()))?;

        let has_input_text = object
            .get("input")
            .and_then(|input| input.get("text"))
            .is_some_and(Value::is_string);
        if has_input_text {
            return serde_json::from_value(body.clone())
                .map(InboundRequest::Vendor)
                .map_err(|e| RelayError::UnrecognizedRequest(e.to_string()));
        }

        if object.get("text").is_some_and(Value::is_string) {
            return serde_json::from_value(body.clone())
                .map(InboundRequest::Generic)
                .map_err(|e| RelayError::UnrecognizedRequest(e.to_string()));
        }

        Err(RelayError::UnrecognizedRequest(
            "expected `text` or `input.text`".into(),
        ))
    }

    /// Decode a body that must be vendor-shaped (`/conversation`).
    pub fn decode_vendor(body: &Value) -> Result<VendorConversationRequest, RelayError> {
        match Self::decode(body)? {
            InboundRequest::Vendor(request) => Ok(request),
            InboundRequest::Generic(_) => Err(RelayError::UnrecognizedRequest(
                "expected `input.text`".into(),
            )),
        }
    }

    pub fn shape(&self) -> WireShape {
        match self {
            InboundRequest::Generic(_) => WireShape::Generic,
            InboundRequest::Vendor(_) => WireShape::Vendor,
        }
    }

    /// The user utterance carried by the request.
    pub fn utterance(&self) -> &str {
        match self {
            InboundRequest::Generic(request) => &request.text,
            InboundRequest::Vendor(request) => &request.input.text,
        }
    }

    /// Session key: `sessionId` or `personaId`, else [`DEFAULT_SESSION_KEY`].
    pub fn session_key(&self) -> &str {
        let key = match self {
            InboundRequest::Generic(request) => request.session_id.as_deref(),
            InboundRequest::Vendor(request) => request.persona_id.as_deref(),
        };
        key.unwrap_or(DEFAULT_SESSION_KEY)
    }

    /// Whether this is the platform's welcome request.
    pub fn is_init(&self) -> bool {
        matches!(self, InboundRequest::Vendor(request) if request.optional_args.is_init())
    }
}

/// Accept a session key (`sessionId` / `personaId`) as a string or a
/// number; anything else is absent.
pub(crate) fn deserialize_session_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode `T` from any JSON value, falling back to `T::default()` when the
/// value is `null` or does not fit.
pub(crate) fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// `true`/`false`, or the strings `"true"`/`"false"`; anything else is absent.
fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Generic reply: `{output:{text}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericReply {
    pub output: TextField,
}

/// Vendor reply: `{answer, answerAvailable}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorReply {
    pub answer: String,
    pub answer_available: bool,
}

/// A reply in whichever shape the request arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireReply {
    Generic(GenericReply),
    Vendor(VendorReply),
}

impl WireReply {
    pub fn new(shape: WireShape, text: impl Into<String>) -> Self {
        let text = text.into();
        match shape {
            WireShape::Generic => WireReply::Generic(GenericReply {
                output: TextField { text },
            }),
            WireShape::Vendor => WireReply::Vendor(VendorReply {
                answer: text,
                answer_available: true,
            }),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            WireReply::Generic(reply) => &reply.output.text,
            WireReply::Vendor(reply) => &reply.answer,
        }
    }
}

/// `POST /reset` body. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default, deserialize_with = "deserialize_session_key")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_session_key")]
    pub persona_id: Option<String>,
}

impl ResetRequest {
    pub fn session_key(&self) -> &str {
        self.session_id
            .as_deref()
            .or(self.persona_id.as_deref())
            .unwrap_or(DEFAULT_SESSION_KEY)
    }
}

/// `POST /reset` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}
