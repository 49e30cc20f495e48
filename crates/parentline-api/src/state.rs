//! Application state shared by every handler.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use parentline_core::llm::box_provider::BoxLlmProvider;
use parentline_core::relay::{RelayService, RelaySettings};
use parentline_core::session::SessionStore;
use parentline_infra::bridge::ConversationClient;
use parentline_infra::llm::create_provider;
use parentline_types::config::RelayConfig;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
    /// Client the WebSocket bridge uses to re-POST to `/conversation`.
    pub bridge: ConversationClient,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the relay around an already-built provider.
    pub fn new(provider: BoxLlmProvider, config: &RelayConfig) -> Self {
        let settings = RelaySettings {
            model: config.model.clone(),
            reply_max_tokens: config.reply_max_tokens,
            persona_max_tokens: config.persona_max_tokens,
            temperature: config.temperature,
        };
        let sessions = SessionStore::new(config.max_interactions);

        Self {
            relay: Arc::new(RelayService::new(provider, sessions, settings)),
            bridge: ConversationClient::new(&config.server_url),
            started_at: Utc::now(),
        }
    }

    /// Wire the relay around the OpenAI provider described by `config`.
    pub fn from_config(config: &RelayConfig) -> Self {
        let provider = create_provider(config);
        tracing::debug!(provider = provider.name(), "Completion provider ready");
        Self::new(provider, config)
    }
}
