//! Configuration loader for Parentline.
//!
//! Resolution order for every setting: command-line flag, environment
//! variable, `parentline.toml`, built-in default. A missing config file is
//! normal; a malformed one is logged and ignored. The only hard failure is
//! a missing `OPENAI_API_KEY` (or an unparsable port).

use std::path::Path;

use secrecy::SecretString;

use parentline_types::config::{
    default_server_url, FileConfig, RelayConfig, DEFAULT_BASE_URL, DEFAULT_HOST,
    DEFAULT_MAX_INTERACTIONS, DEFAULT_MODEL, DEFAULT_PERSONA_MAX_TOKENS, DEFAULT_PORT,
    DEFAULT_REPLY_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use parentline_types::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "parentline.toml";

/// Settings given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub server_url: Option<String>,
}

/// Load `parentline.toml` from `path`.
///
/// - Missing file: returns [`FileConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
pub async fn load_file_config(path: &Path) -> FileConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return FileConfig::default();
        }
        Err(err) => {
            let err = ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            };
            tracing::warn!("{err}, using defaults");
            return FileConfig::default();
        }
    };

    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            let err = ConfigError::Parse {
                path: path.display().to_string(),
                message: err.to_string(),
            };
            tracing::warn!("{err}, using defaults");
            FileConfig::default()
        }
    }
}

/// Merge overrides, environment, and file config into a [`RelayConfig`].
///
/// `env` looks up an environment variable; pass `|k| std::env::var(k).ok()`
/// in production. Empty values count as unset.
pub fn resolve_config<E>(
    overrides: &ConfigOverrides,
    file: FileConfig,
    env: E,
) -> Result<RelayConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let api_key = env("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

    let env_port = match env("PORT").or_else(|| env("EXPRESS_PORT")) {
        Some(raw) => Some(
            raw.trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
        ),
        None => None,
    };
    let port = overrides
        .port
        .or(env_port)
        .or(file.port)
        .unwrap_or(DEFAULT_PORT);

    let host = overrides
        .host
        .clone()
        .or_else(|| env("HOST"))
        .or(file.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let server_url = overrides
        .server_url
        .clone()
        .or_else(|| env("SERVER_URL"))
        .or(file.server_url)
        .unwrap_or_else(|| default_server_url(port));

    Ok(RelayConfig {
        api_key: SecretString::from(api_key),
        model: env("OPENAI_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        base_url: env("OPENAI_BASE_URL")
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        reply_max_tokens: file.reply_max_tokens.unwrap_or(DEFAULT_REPLY_MAX_TOKENS),
        persona_max_tokens: file.persona_max_tokens.unwrap_or(DEFAULT_PERSONA_MAX_TOKENS),
        temperature: file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_interactions: file.max_interactions.unwrap_or(DEFAULT_MAX_INTERACTIONS),
        host,
        port,
        server_url: server_url.trim_end_matches('/').to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_file_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_file_config(&tmp.path().join(CONFIG_FILE_NAME)).await;
        assert_eq!(config, FileConfig::default());
    }

    #[tokio::test]
    async fn load_file_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(
            &path,
            r#"
port = 6060
model = "gpt-4o"
max_interactions = 20
"#,
        )
        .await
        .unwrap();

        let config = load_file_config(&path).await;
        assert_eq!(config.port, Some(6060));
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.max_interactions, Some(20));
    }

    #[tokio::test]
    async fn load_file_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_file_config(&path).await;
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn resolve_config_requires_api_key() {
        let err = resolve_config(&ConfigOverrides::default(), FileConfig::default(), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = resolve_config(
            &ConfigOverrides::default(),
            FileConfig::default(),
            env_from(&[("OPENAI_API_KEY", "  ")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn resolve_config_defaults() {
        let config = resolve_config(
            &ConfigOverrides::default(),
            FileConfig::default(),
            env_from(&[("OPENAI_API_KEY", "sk-test")]),
        )
        .unwrap();
        assert_eq!(config.api_key.expose_secret(), "sk-test");
        assert_eq!(config.port, 5050);
        assert_eq!(config.server_url, "http://localhost:5050");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_interactions, 70);
    }

    #[test]
    fn resolve_config_port_precedence() {
        let file = FileConfig {
            port: Some(7000),
            ..Default::default()
        };

        let from_express = resolve_config(
            &ConfigOverrides::default(),
            file.clone(),
            env_from(&[("OPENAI_API_KEY", "k"), ("EXPRESS_PORT", "8000")]),
        )
        .unwrap();
        assert_eq!(from_express.port, 8000);
        assert_eq!(from_express.server_url, "http://localhost:8000");

        let from_port = resolve_config(
            &ConfigOverrides::default(),
            file.clone(),
            env_from(&[("OPENAI_API_KEY", "k"), ("PORT", "9000"), ("EXPRESS_PORT", "8000")]),
        )
        .unwrap();
        assert_eq!(from_port.port, 9000);

        let from_flag = resolve_config(
            &ConfigOverrides {
                port: Some(9999),
                ..Default::default()
            },
            file.clone(),
            env_from(&[("OPENAI_API_KEY", "k"), ("PORT", "9000")]),
        )
        .unwrap();
        assert_eq!(from_flag.port, 9999);

        let from_file =
            resolve_config(&ConfigOverrides::default(), file, env_from(&[("OPENAI_API_KEY", "k")]))
                .unwrap();
        assert_eq!(from_file.port, 7000);
    }

    #[test]
    fn resolve_config_rejects_bad_port() {
        let err = resolve_config(
            &ConfigOverrides::default(),
            FileConfig::default(),
            env_from(&[("OPENAI_API_KEY", "k"), ("PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "eighty"));
    }

    #[test]
    fn resolve_config_server_url_trims_slash() {
        let config = resolve_config(
            &ConfigOverrides::default(),
            FileConfig::default(),
            env_from(&[("OPENAI_API_KEY", "k"), ("SERVER_URL", "http://relay.local:5050/")]),
        )
        .unwrap();
        assert_eq!(config.server_url, "http://relay.local:5050");
    }
}
