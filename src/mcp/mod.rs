//! MCP (Model Context Protocol) server configuration.
//!
//! Merges a read-only registry of built-in servers with a user-editable
//! overlay (enabled flags + custom servers) persisted to
//! `{working_dir}/.mcp-manager/mcp-servers.json`.

mod config;
mod error;
mod manager;
mod probe;
mod registry;
mod types;

pub use config::McpConfigStore;
pub use error::{McpError, McpResult};
pub use manager::{validate_server_id, McpManager};
pub use probe::{ConnectivityProbe, ProbeOutcome};
pub use registry::{humanize_id, project, BuiltinRegistry, StaticRegistry};
pub use types::*;
