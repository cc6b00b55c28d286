//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::net::TcpListener;

use anyhow::Context;

use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        environment = ?config.environment,
        "Starting blog API server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref())
        .await
        .context("failed to initialize post store")?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    api_server::run(listener, state)?.await?;

    Ok(())
}
