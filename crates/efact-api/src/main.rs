//! # efact-api — Binary Entry Point
//!
//! Loads configuration and the signing key pair from the environment, then
//! serves the API. Key-load failure stops startup.

use anyhow::Context;
use efact_api::{ApiConfig, AppState, LogFormat};
use efact_crypto::{DocumentSigner, EnvKeyProvider, KeyProvider};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format);

    let keys = EnvKeyProvider::new()
        .load_key_pair()
        .context("failed to load signing key pair")?;
    let state = AppState::in_memory(DocumentSigner::new(keys));

    let metrics = if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        tracing::info!("metrics disabled");
        None
    };

    let app = efact_api::app(state, metrics);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("efact API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
