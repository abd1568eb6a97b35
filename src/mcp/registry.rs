//! Built-in server registry and the merged server listing.

use indexmap::IndexMap;
use std::path::Path;

use super::error::McpResult;
use super::types::{OverlayRecord, ServerConfig, ServerDescriptor};

/// Read-only source of system-provided servers.
///
/// Iteration order of [`servers`](BuiltinRegistry::servers) is the
/// declaration order used when listing.
pub trait BuiltinRegistry: Send + Sync {
    fn servers(&self) -> &IndexMap<String, ServerConfig>;

    fn get(&self, id: &str) -> Option<&ServerConfig> {
        self.servers().get(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.servers().contains_key(id)
    }
}

/// Registry loaded once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    servers: IndexMap<String, ServerConfig>,
}

impl StaticRegistry {
    pub fn new(servers: IndexMap<String, ServerConfig>) -> Self {
        Self { servers }
    }

    /// Load built-ins from a JSON object of id -> server record.
    ///
    /// A missing file yields an empty registry; a malformed one is an error.
    pub fn from_file(path: &Path) -> McpResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "No built-in MCP registry at {}, starting with no built-in servers",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let servers: IndexMap<String, ServerConfig> = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded {} built-in MCP servers from {}",
            servers.len(),
            path.display()
        );
        Ok(Self { servers })
    }
}

impl BuiltinRegistry for StaticRegistry {
    fn servers(&self) -> &IndexMap<String, ServerConfig> {
        &self.servers
    }
}

/// Merge built-ins and the overlay into the list shown to API consumers.
///
/// Built-ins come first in registry order, then custom servers in overlay
/// order. Custom entries shadowing a built-in id are skipped.
pub fn project(builtin: &dyn BuiltinRegistry, overlay: &OverlayRecord) -> Vec<ServerDescriptor> {
    let builtins = builtin.servers().iter().map(|(id, config)| {
        let name = config
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| humanize_id(id));
        ServerDescriptor::new(id, name, config, overlay.is_enabled(id), true)
    });

    let customs = overlay
        .custom
        .iter()
        .filter(|(id, _)| !builtin.contains(id))
        .map(|(id, config)| {
            let name = config.name().unwrap_or(id).to_string();
            ServerDescriptor::new(id, name, config, overlay.is_enabled(id), false)
        });

    builtins.chain(customs).collect()
}

/// "sequential-thinking" -> "Sequential thinking"
pub fn humanize_id(id: &str) -> String {
    let spaced = id.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
