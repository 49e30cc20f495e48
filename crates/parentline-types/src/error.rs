use thiserror::Error;

use crate::llm::LlmError;

/// Why a turn did not produce a model reply that can be delivered as-is.
///
/// Every variant still ends in an HTTP 200 with a canned string; the
/// formatter decides which string and which wire shape.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream completion failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("reply rejected by content filter")]
    FilterRejected,

    #[error("unrecognized request: {0}")]
    UnrecognizedRequest(String),
}

/// Errors raised while resolving startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_wraps_llm_error() {
        let err: RelayError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, RelayError::Upstream(LlmError::AuthenticationFailed)));
        assert_eq!(
            err.to_string(),
            "upstream completion failed: authentication failed"
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingApiKey.to_string(),
            "OPENAI_API_KEY is not set"
        );
        assert_eq!(
            ConfigError::InvalidPort("abc".into()).to_string(),
            "invalid port 'abc'"
        );
    }
}
