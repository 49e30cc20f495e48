//! `parentline serve`.

use std::path::Path;

use anyhow::Context;

use super::{load_config, ServeArgs};
use crate::http::router::build_router;
use crate::state::AppState;

/// Bind the listener and serve until Ctrl+C or SIGTERM.
pub async fn serve(config_path: &Path, args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(config_path, args).await?;
    let state = AppState::from_config(&config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        model = %config.model,
        callback = %state.bridge.endpoint(),
        max_interactions = config.max_interactions,
        "Parentline relay listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
