//! Relay orchestration.
//!
//! `RelayService` is the single owner of the session store and the
//! completion provider. One call handles one inbound request end to end:
//!
//! decode shape -> session lookup/create (persona generation on miss) ->
//! prompt assembly -> completion -> content filter -> format reply ->
//! record turn -> evict at the interaction limit.
//!
//! Every path ends in a [`FormattedReply`]; failures become canned strings.

use parentline_types::error::RelayError;
use parentline_types::llm::CompletionRequest;
use parentline_types::protocol::{InboundRequest, ResetResponse, WireShape};
use serde_json::Value;

use crate::filter::ContentFilter;
use crate::llm::box_provider::BoxLlmProvider;
use crate::persona::generate_persona_names;
use crate::prompt::{Prompt, PromptBuilder};
use crate::reply::{FormattedReply, ReplyFormatter};
use crate::session::SessionStore;

/// Completion parameters shared by every turn.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub reply_max_tokens: u32,
    pub persona_max_tokens: u32,
    pub temperature: f64,
}

/// Result of one conversation turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_key: String,
    pub formatted: FormattedReply,
    /// Interaction count after this turn, `None` when the turn was not recorded.
    pub interactions: Option<u32>,
    pub evicted: bool,
}

pub struct RelayService {
    provider: BoxLlmProvider,
    sessions: SessionStore,
    settings: RelaySettings,
}

impl RelayService {
    pub fn new(provider: BoxLlmProvider, sessions: SessionStore, settings: RelaySettings) -> Self {
        Self {
            provider,
            sessions,
            settings,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Handle a `/chat` body in either shape.
    ///
    /// Unrecognized bodies are answered in the generic shape.
    pub async fn handle(&self, body: &Value) -> FormattedReply {
        match InboundRequest::decode(body) {
            Ok(request) => self.dispatch(&request).await,
            Err(err) => {
                tracing::warn!(error = %err, "Unrecognized /chat request");
                ReplyFormatter::format(WireShape::Generic, &Err(err))
            }
        }
    }

    /// Handle a `/conversation` body, which must be vendor-shaped.
    pub async fn handle_conversation(&self, body: &Value) -> FormattedReply {
        match InboundRequest::decode_vendor(body) {
            Ok(request) => self.dispatch(&InboundRequest::Vendor(request)).await,
            Err(err) => {
                tracing::warn!(error = %err, "Unrecognized /conversation request");
                ReplyFormatter::format(WireShape::Vendor, &Err(err))
            }
        }
    }

    async fn dispatch(&self, request: &InboundRequest) -> FormattedReply {
        if request.is_init() {
            tracing::debug!(session_key = %request.session_key(), "Init request, sending greeting");
            return ReplyFormatter::greeting();
        }

        if request.utterance().trim().is_empty() {
            let err = RelayError::UnrecognizedRequest("empty utterance".into());
            tracing::warn!(session_key = %request.session_key(), "Empty utterance");
            return ReplyFormatter::format(request.shape(), &Err(err));
        }

        self.run_turn(request).await.formatted
    }

    /// Run one full conversation turn for a decoded, non-empty request.
    #[tracing::instrument(
        name = "relay_turn",
        skip(self, request),
        fields(session_key = %request.session_key(), shape = ?request.shape())
    )]
    pub async fn run_turn(&self, request: &InboundRequest) -> TurnOutcome {
        let key = request.session_key().to_string();
        let utterance = request.utterance().trim();

        let (session, _) = self
            .sessions
            .get_or_create(&key, || {
                generate_persona_names(
                    &self.provider,
                    &self.settings.model,
                    self.settings.persona_max_tokens,
                )
            })
            .await;

        let prompt = PromptBuilder::build(&session.names, &session.history, utterance);
        let outcome = self
            .complete(&prompt)
            .await
            .and_then(|text| ContentFilter::check(&text));

        match &outcome {
            Err(RelayError::Upstream(err)) => {
                tracing::error!(error = %err, "Completion call failed");
            }
            Err(RelayError::FilterRejected) => {
                tracing::warn!("Model reply filtered, sending redirect");
            }
            _ => {}
        }

        let formatted = ReplyFormatter::format(request.shape(), &outcome);

        // Upstream failures leave the transcript untouched.
        let (interactions, evicted) = if matches!(outcome, Err(RelayError::Upstream(_))) {
            (None, false)
        } else {
            let interactions = self.sessions.record_turn(&key, utterance, formatted.text());
            (interactions, self.sessions.evict_if_expired(&key))
        };

        tracing::info!(turn = ?interactions, evicted, fallback = formatted.fallback, "Turn complete");

        TurnOutcome {
            session_key: key,
            formatted,
            interactions,
            evicted,
        }
    }

    /// Delete a session. Succeeds whether or not it existed.
    pub fn reset(&self, key: &str) -> ResetResponse {
        let existed = self.sessions.remove(key);
        tracing::info!(session_key = %key, existed, "Session reset");
        ResetResponse {
            success: true,
            message: format!("Session {key} has been reset"),
        }
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, RelayError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            system: Some(prompt.system.clone()),
            prompt: prompt.user.clone(),
            max_tokens: self.settings.reply_max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let response = self.provider.complete(&request).await?;
        Ok(response.content)
    }
}
