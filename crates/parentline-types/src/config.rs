//! Configuration types for Parentline.
//!
//! `FileConfig` is the optional `parentline.toml` on disk; every field is
//! optional so a partial file only overrides what it names. `RelayConfig` is
//! the fully resolved configuration the process runs with.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REPLY_MAX_TOKENS: u32 = 150;
pub const DEFAULT_PERSONA_MAX_TOKENS: u32 = 60;
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_MAX_INTERACTIONS: u32 = 70;

/// Contents of `parentline.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub server_url: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub reply_max_tokens: Option<u32>,
    pub persona_max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub max_interactions: Option<u32>,
}

/// Resolved runtime configuration.
///
/// Debug output redacts the API key.
#[derive(Debug)]
pub struct RelayConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub reply_max_tokens: u32,
    pub persona_max_tokens: u32,
    pub temperature: f64,
    /// Session is evicted once its interaction count reaches this value.
    pub max_interactions: u32,
    pub host: String,
    pub port: u16,
    /// Base URL the WebSocket bridge uses to call back into this process.
    pub server_url: String,
}

impl RelayConfig {
    /// Socket address string for the listener (`host:port`).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default callback URL for a given port.
pub fn default_server_url(port: u16) -> String {
    format!("http://localhost:{port}")
}
