//! Digital twin chat API entry point.
//!
//! Binary name: `twin`
//!
//! Reads configuration, initializes tracing and the chat service, then
//! serves the HTTP API until Ctrl+C or SIGTERM.

mod config;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use twin_observe::tracing_setup::{init_tracing, shutdown_tracing};

use config::Cli;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init(&cli).await?;
    let cors = http::router::cors_layer(&cli.allowed_origins())?;
    let router = http::router::build_router(state, cors);

    let addr = cli.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, origins = ?cli.allowed_origins(), "Digital twin API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
