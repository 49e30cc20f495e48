//! Shared fixtures for router and WebSocket tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use parentline_core::llm::box_provider::BoxLlmProvider;
use parentline_core::llm::provider::LlmProvider;
use parentline_types::config::RelayConfig;
use parentline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::state::AppState;

/// Answers persona requests with "Maria"/"Sam" and turn requests from a
/// script; an exhausted script repeats "Fine, thanks."
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    calls: Arc<AtomicUsize>,
    replies: Arc<Mutex<VecDeque<Result<String, ()>>>>,
}

impl ScriptedProvider {
    pub fn with_replies(replies: Vec<Result<&str, ()>>) -> Self {
        let provider = Self::default();
        *provider.replies.lock().unwrap() =
            replies.into_iter().map(|r| r.map(str::to_string)).collect();
        provider
    }

    /// Total upstream calls, persona generation included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let is_persona = request
            .system
            .as_deref()
            .is_some_and(|s| s.contains("JSON object"));

        let content = if is_persona {
            r#"{"parent": "Maria", "child": "Sam"}"#.to_string()
        } else {
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => text,
                Some(Err(())) => {
                    return Err(LlmError::Provider {
                        message: "upstream unavailable".into(),
                    });
                }
                None => "Fine, thanks.".to_string(),
            }
        };

        Ok(CompletionResponse {
            id: "resp-test".into(),
            content,
            model: request.model.clone(),
        })
    }
}

pub fn test_config(server_url: &str) -> RelayConfig {
    RelayConfig {
        api_key: SecretString::from("sk-test".to_string()),
        model: "gpt-4o-mini".into(),
        base_url: "http://127.0.0.1:9".into(),
        reply_max_tokens: 150,
        persona_max_tokens: 60,
        temperature: 0.8,
        max_interactions: 70,
        host: "127.0.0.1".into(),
        port: 0,
        server_url: server_url.into(),
    }
}

pub fn test_state(provider: ScriptedProvider) -> AppState {
    AppState::new(BoxLlmProvider::new(provider), &test_config("http://127.0.0.1:9"))
}
