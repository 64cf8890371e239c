mod advice;
mod advisor_client;
mod config;
mod errors;
mod routes;
mod state;
mod statement;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor_client::{AdviceGenerator, GeminiClient};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting finance advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize advice client
    let advisor = GeminiClient::new(config.advisor_config())
        .context("Failed to build advice service client")?;
    info!("Advice client initialized (model: {})", advisor.model());
    match config.advisor_timeout {
        Some(timeout) => info!("Advice calls time out after {}s", timeout.as_secs()),
        None => info!("Advice calls have no timeout"),
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        advisor: Arc::new(advisor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser UI is served from a different origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
