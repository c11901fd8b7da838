//! HTTP listener and shutdown handling.

use anyhow::{Context, Result};
use axum::Router;
use filestore_core::Config;
use std::net::SocketAddr;

/// Serve `app` until Ctrl+C or SIGTERM, letting in-flight requests finish.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        %addr,
        storage_type = %config.storage_type(),
        max_file_size_bytes = config.max_file_size_bytes(),
        allowed_extensions = %config.allowed_extensions().join(","),
        "File service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("File service stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    signal(SignalKind::terminate())
        .expect("Failed to install SIGTERM handler")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

async fn wait_for_shutdown() {
    let signal = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Failed to install Ctrl+C handler");
            "ctrl_c"
        }
        _ = terminate() => "sigterm",
    };

    tracing::info!(signal, "Shutdown requested, draining connections");
}
