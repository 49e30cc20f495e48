//! `parentline check-config`.

use std::path::Path;

use super::{load_config, ServeArgs};

/// Print the resolved configuration as JSON. The API key is never printed.
pub async fn check_config(config_path: &Path, args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(config_path, args).await?;

    let summary = serde_json::json!({
        "config_file": config_path.display().to_string(),
        "api_key": "<set>",
        "model": config.model,
        "base_url": config.base_url,
        "reply_max_tokens": config.reply_max_tokens,
        "persona_max_tokens": config.persona_max_tokens,
        "temperature": config.temperature,
        "max_interactions": config.max_interactions,
        "bind_addr": config.bind_addr(),
        "server_url": config.server_url,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
