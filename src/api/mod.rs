//! HTTP API.

pub mod mcp_servers;
mod routes;

pub use routes::{router, serve, AppState, HealthResponse};
