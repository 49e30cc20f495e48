//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait
//! defined in `parentline-core`, plus a factory that builds it from the
//! resolved [`RelayConfig`].
//!
//! [`LlmProvider`]: parentline_core::llm::provider::LlmProvider

pub mod openai;

use parentline_core::llm::box_provider::BoxLlmProvider;
use parentline_types::config::RelayConfig;

use self::openai::OpenAiProvider;

/// Build the completion provider for this process.
pub fn create_provider(config: &RelayConfig) -> BoxLlmProvider {
    BoxLlmProvider::new(OpenAiProvider::new(
        &config.api_key,
        &config.base_url,
        &config.model,
    ))
}
