//! HTTP router assembly and server startup.

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::mcp::{ConnectivityProbe, McpConfigStore, McpManager, StaticRegistry};

use super::mcp_servers;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Built-in + custom MCP server management
    pub mcp: Arc<McpManager>,
}

impl AppState {
    /// Wire up state from config, loading the built-in registry from disk.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let builtin = StaticRegistry::from_file(&config.builtin_registry_path)?;
        let store = McpConfigStore::new(config.servers_config_path.clone());
        let probe = ConnectivityProbe::new(config.probe_timeout)?;
        let mcp = Arc::new(McpManager::new(store, Arc::new(builtin), probe));
        Ok(Self { config, mcp })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the application router.
///
/// Only the listed routes are claimed; anything else falls through to the
/// default 404 so this router can be merged into a larger one.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/mcp-servers", mcp_servers::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config.clone())?);
    tracing::info!(
        "MCP server config at {}",
        state.mcp.store().path().display()
    );

    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
