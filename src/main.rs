//! Review Sentiment Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the analysis engine, routes, and
//! middleware.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_sentiment_analyzer::api::{self, AppState};
use review_sentiment_analyzer::config::RemoteConfig;
use review_sentiment_analyzer::engine::AnalysisEngine;
use review_sentiment_analyzer::metrics::Metrics;
use review_sentiment_analyzer::remote::build_remote;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere. This lets REMOTE_API_* and
    // BIND_ADDR come from a checked-out .env file.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = RemoteConfig::load();
    tracing::info!(
        enabled = config.enabled,
        base_url = %config.base_url,
        "remote inference configuration"
    );

    let metrics = Metrics::init(config.timeout_secs);
    let remote = build_remote(&config);
    let engine = Arc::new(AnalysisEngine::new(remote));

    let app = api::create_router(AppState::new(engine)).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
