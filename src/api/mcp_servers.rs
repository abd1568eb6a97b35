//! MCP server management API endpoints.
//!
//! Provides endpoints for managing built-in and custom MCP servers:
//! - List servers (merged view)
//! - Create custom server
//! - Toggle enabled state
//! - Test connectivity
//! - Delete custom server

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::mcp::{CreateServerRequest, McpError, ProbeOutcome, ServerDescriptor};

use super::routes::AppState;

/// Create MCP server routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_servers))
        .route("/", post(create_server))
        .route("/:id", delete(delete_server))
        .route("/:id/toggle", post(toggle_server))
        .route("/:id/test", post(test_server))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListServersResponse {
    pub success: bool,
    pub servers: Vec<ServerDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub id: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ServerIdResponse {
    pub success: bool,
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/mcp-servers - List built-in and custom servers.
async fn list_servers(State(state): State<Arc<AppState>>) -> Json<ListServersResponse> {
    let servers = state.mcp.list().await;
    Json(ListServersResponse {
        success: true,
        servers,
    })
}

/// POST /api/mcp-servers - Create a custom server.
async fn create_server(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateServerRequest>, JsonRejection>,
) -> Result<Json<ServerIdResponse>, McpError> {
    let Json(req) = body.map_err(|e| McpError::Validation(e.body_text()))?;
    let (id, config) = req.into_parts()?;

    state.mcp.create(&id, config).await?;

    Ok(Json(ServerIdResponse { success: true, id }))
}

/// POST /api/mcp-servers/:id/toggle - Flip a server's enabled state.
async fn toggle_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, McpError> {
    let enabled = state.mcp.toggle(&id).await?;
    Ok(Json(ToggleResponse {
        success: true,
        id,
        enabled,
    }))
}

/// POST /api/mcp-servers/:id/test - Check that a server is reachable.
///
/// A failed check is still a 200 response with `success: false`.
async fn test_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProbeOutcome>, McpError> {
    state.mcp.test(&id).await.map(Json)
}

/// DELETE /api/mcp-servers/:id - Delete a custom server.
async fn delete_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServerIdResponse>, McpError> {
    state.mcp.delete(&id).await?;
    Ok(Json(ServerIdResponse { success: true, id }))
}
