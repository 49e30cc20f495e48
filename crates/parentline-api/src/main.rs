//! Parentline relay entry point.
//!
//! Binary name: `parentline`
//!
//! Loads `.env`, parses CLI arguments, sets up tracing, then either serves
//! the relay or prints the resolved configuration.

mod cli;
mod http;
mod state;

#[cfg(test)]
mod test_support;

use clap::Parser;

use cli::{Cli, Commands};
use parentline_observe::tracing_setup::{
    filter_for_verbosity, init_tracing, shutdown_tracing, TracingOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose).to_string(),
        json: cli.json_logs,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config_path = cli.config_path().to_path_buf();
    let result = match cli.command {
        None => cli::serve::serve(&config_path, &Default::default()).await,
        Some(Commands::Serve(args)) => cli::serve::serve(&config_path, &args).await,
        Some(Commands::CheckConfig(args)) => cli::check::check_config(&config_path, &args).await,
    };

    shutdown_tracing();
    result
}
