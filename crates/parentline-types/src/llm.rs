//! LLM request/response types for Parentline.
//!
//! These types model the data shapes for chat-completion calls: the
//! assembled request, the generated reply, and the error taxonomy used when
//! the upstream API fails.

use serde::{Deserialize, Serialize};

/// Request to an LLM provider for a completion.
///
/// One optional system prompt plus one user prompt; the transcript is
/// already rendered into `prompt`. An empty `model` means "use the
/// provider's configured default".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}

/// Errors from LLM provider operations.
///
/// Every variant is an upstream failure from the relay's point of view;
/// callers substitute a canned apology and never retry.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_skips_empty_optionals() {
        let request = CompletionRequest {
            model: String::new(),
            system: None,
            prompt: "hello".into(),
            max_tokens: 60,
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
        assert_eq!(json["prompt"], "hello");
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            message: "connection reset".into(),
        };
        assert_eq!(err.to_string(), "provider error: connection reset");
    }
}
