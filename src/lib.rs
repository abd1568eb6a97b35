//! # MCP Manager
//!
//! Configuration service for the MCP servers available to an agent runtime.
//!
//! This library provides:
//! - A read-only registry of built-in servers, injected at startup
//! - A persisted overlay holding enabled flags and user-defined servers
//! - An HTTP API to list, create, toggle, test and delete servers
//!
//! ## Request Flow
//!
//! ```text
//!   HTTP request
//!        │
//!        ▼
//!   api::mcp_servers ──► McpManager ──► McpConfigStore (load)
//!                            │
//!                            ├── project(builtin, overlay)   list
//!                            ├── toggle / create / delete    save
//!                            └── ConnectivityProbe           test
//! ```
//!
//! ## Modules
//! - `mcp`: overlay storage, registry merge, mutations, connectivity probe
//! - `api`: axum router and handlers
//! - `config`: process configuration from the environment

pub mod api;
pub mod config;
pub mod mcp;

pub use config::Config;
