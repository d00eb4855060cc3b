// ABOUTME: Wellness dashboard server binary wiring config, models, and providers
// ABOUTME: Loads model artifacts once at startup and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Wellness Dashboard Server Binary
//!
//! Starts the dashboard API: loads the trained model artifacts, builds the
//! telemetry provider chain, and serves the REST routes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wellness_dashboard::{
    config::ServerConfig,
    context::ServerResources,
    logging::LoggingConfig,
    providers::{token_store, GoogleFitClient},
    routes,
};
use wellness_intelligence::{InferenceEngine, ModelBundle};

#[derive(Parser)]
#[command(name = "wellness-dashboard")]
#[command(about = "Personal wellness dashboard aggregating fitness telemetry into daily insights")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the model artifact directory
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }

    info!("Starting wellness dashboard server");

    let bundle = ModelBundle::load(&config.model_dir).with_context(|| {
        format!(
            "loading model artifacts from {}",
            config.model_dir.display()
        )
    })?;
    let engine = Arc::new(InferenceEngine::from_bundle(bundle));
    info!(model_dir = %config.model_dir.display(), "model artifacts loaded");

    let credentials = Arc::new(token_store::file_provider_from_paths(
        &config.token_path,
        &config.credentials_path,
        config.fetch_timeout,
    )?);
    let http = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .build()?;
    let telemetry = Arc::new(GoogleFitClient::new(
        http,
        config.fitness_api_base.clone(),
        credentials,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = Arc::new(ServerResources::new(config, engine, telemetry));
    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown handler");
    }
}
