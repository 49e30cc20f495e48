//! CLI definitions and dispatch for the `parentline` binary.
//!
//! Running the binary with no subcommand is the same as `parentline serve`.

pub mod check;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use parentline_infra::config::{
    load_file_config, resolve_config, ConfigOverrides, CONFIG_FILE_NAME,
};
use parentline_types::config::RelayConfig;

/// Conversational relay that answers as a parent of an autistic child.
#[derive(Parser)]
#[command(name = "parentline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as one JSON object per line.
    #[arg(long, global = true, env = "PARENTLINE_JSON_LOGS")]
    pub json_logs: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "PARENTLINE_OTEL")]
    pub otel: bool,

    /// Path to the TOML config file.
    #[arg(long, global = true, env = "PARENTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(CONFIG_FILE_NAME))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP and WebSocket server (default).
    Serve(ServeArgs),

    /// Resolve the configuration, print it with the API key redacted, and exit.
    CheckConfig(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT / EXPRESS_PORT).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Base URL the WebSocket bridge posts back to (overrides SERVER_URL).
    #[arg(long)]
    pub server_url: Option<String>,
}

impl From<&ServeArgs> for ConfigOverrides {
    fn from(args: &ServeArgs) -> Self {
        ConfigOverrides {
            host: args.host.clone(),
            port: args.port,
            server_url: args.server_url.clone(),
        }
    }
}

/// Resolve flags, environment, and config file into a [`RelayConfig`].
pub async fn load_config(config_path: &Path, args: &ServeArgs) -> anyhow::Result<RelayConfig> {
    let file = load_file_config(config_path).await;
    resolve_config(&ConfigOverrides::from(args), file, |key| {
        std::env::var(key).ok()
    })
    .context("invalid configuration")
}
