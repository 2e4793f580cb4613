// Main entry point - Dependency injection, polling loop and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::render_orchestrator::RenderOrchestrator;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::dashboard_view::DashboardView;
use crate::infrastructure::thingspeak_fetcher::ThingSpeakFetcher;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create fetcher (infrastructure layer)
    let fetcher = Arc::new(ThingSpeakFetcher::new(
        config.feed.base_url.clone(),
        Duration::from_secs(config.feed.timeout_secs),
    )?);

    // Display surface shared by the render loop and the HTTP handlers
    let view = DashboardView::new();

    // Polling loop (application layer); lives for the whole process
    let orchestrator = RenderOrchestrator::new(
        config.render_settings()?,
        fetcher,
        Arc::new(view.clone()),
        view.sinks(),
    );
    tokio::spawn(orchestrator.run());

    let state = Arc::new(AppState { view });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting weather-telemetry on {} (channel {}, every {}s)",
        addr,
        config.feed.channel_id,
        config.polling.interval_secs
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
