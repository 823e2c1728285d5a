//! tipcheck server entry point.
//!
//! Serves the tip validation and allowance endpoints over HTTP.
//! Logs are JSON on stderr.

use anyhow::{Context, Result};
use tipcheck_client::{AllowanceClient, AllowanceConfig, build_validation_service};
use tipcheck_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let addr = config.bind_addr()?;

    let validation = build_validation_service(&config).await?;
    let allowance = AllowanceClient::new(AllowanceConfig::from(&config))?;
    let app = handler::router(handler::AppState::new(validation, allowance));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Starting tipcheck server");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
