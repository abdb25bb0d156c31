// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::queries::DiagnosticsQueries;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::trace::spawn_trace;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pd_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create API client (infrastructure layer)
    let (trace, trace_log) = spawn_trace(config.trace.capacity);
    let client = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        trace,
    )?;

    // Create query functions (application layer)
    let queries = DiagnosticsQueries::new(Arc::new(client));

    // Create application state
    let state = Arc::new(AppState::new(queries, config.views.page_size, trace_log));

    // Build router (presentation layer)
    let router = build_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind address '{}'", config.server.bind))?;
    tracing::info!(
        "Starting pd-dashboard on {} against {}",
        addr,
        config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
