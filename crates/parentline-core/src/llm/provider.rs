//! LlmProvider trait definition.
//!
//! This is the core abstraction the completion client implements. Uses
//! RPITIT for `complete` so implementations can be plain `async fn`.

use parentline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat-completion backends.
///
/// Implementations live in parentline-infra (e.g., `OpenAiProvider`).
/// A failed call is returned as [`LlmError`]; callers never retry.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
