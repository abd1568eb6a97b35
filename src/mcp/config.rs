//! Overlay persistence.
//!
//! The overlay lives in a single pretty-printed JSON file with two keys,
//! `enabled` and `custom`. A missing or unreadable file is not an error:
//! callers get the default overlay (all built-ins enabled, no custom servers).

use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::McpResult;
use super::registry::BuiltinRegistry;
use super::types::OverlayRecord;

/// File-backed store for the MCP server overlay.
#[derive(Debug, Clone)]
pub struct McpConfigStore {
    path: PathBuf,
}

impl McpConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the overlay, falling back to defaults derived from `builtin`.
    pub async fn load(&self, builtin: &dyn BuiltinRegistry) -> OverlayRecord {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No MCP server config at {}, using defaults",
                    self.path.display()
                );
                return Self::defaults(builtin);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read MCP server config from {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                return Self::defaults(builtin);
            }
        };

        match serde_json::from_str(&contents) {
            Ok(overlay) => overlay,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse MCP server config at {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                Self::defaults(builtin)
            }
        }
    }

    /// Replace the file with the full overlay.
    pub async fn save(&self, overlay: &OverlayRecord) -> McpResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(overlay)?;
        fs::write(&self.path, contents).await?;
        tracing::debug!("Saved MCP server config to {}", self.path.display());
        Ok(())
    }

    fn defaults(builtin: &dyn BuiltinRegistry) -> OverlayRecord {
        OverlayRecord::with_builtins(builtin.servers().keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::StaticRegistry;
    use crate::mcp::types::ServerConfig;
    use indexmap::IndexMap;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn registry() -> StaticRegistry {
        let mut servers = IndexMap::new();
        servers.insert(
            "git".to_string(),
            ServerConfig::Stdio {
                name: None,
                command: "mcp-server-git".to_string(),
                args: Vec::new(),
                env: BTreeMap::new(),
            },
        );
        servers.insert(
            "fetch".to_string(),
            ServerConfig::Http {
                name: Some("Fetch".to_string()),
                url: "http://localhost:9000/mcp".to_string(),
                headers: BTreeMap::new(),
            },
        );
        StaticRegistry::new(servers)
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let store = McpConfigStore::new(temp.path().join("mcp-servers.json"));

        let overlay = store.load(&registry()).await;

        assert_eq!(overlay.enabled.len(), 2);
        assert_eq!(overlay.enabled.get("git"), Some(&true));
        assert_eq!(overlay.enabled.get("fetch"), Some(&true));
        assert!(overlay.custom.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mcp-servers.json");
        std::fs::write(&path, "{ not json").unwrap();

        let overlay = McpConfigStore::new(&path).load(&registry()).await;

        assert_eq!(overlay, OverlayRecord::with_builtins(["git", "fetch"]));
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/dir/mcp-servers.json");
        let store = McpConfigStore::new(&path);

        store.save(&OverlayRecord::default()).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(value.get("enabled").is_some());
        assert!(value.get("custom").is_some());
        // Pretty-printed with 2-space indentation.
        assert!(written.contains("\n  \"enabled\""));
    }

    #[tokio::test]
    async fn test_save_then_load_is_fixed_point() {
        let temp = tempdir().unwrap();
        let store = McpConfigStore::new(temp.path().join("mcp-servers.json"));
        let builtin = registry();

        let mut overlay = store.load(&builtin).await;
        overlay.enabled.insert("fetch".to_string(), false);
        overlay.enabled.insert("stale-entry".to_string(), false);
        overlay.enabled.insert("my-tool".to_string(), true);
        overlay.custom.insert(
            "my-tool".to_string(),
            ServerConfig::Http {
                name: Some("My Tool".to_string()),
                url: "https://x".to_string(),
                headers: BTreeMap::from([("X-Key".to_string(), "k".to_string())]),
            },
        );
        store.save(&overlay).await.unwrap();

        let reloaded = store.load(&builtin).await;
        assert_eq!(reloaded, overlay);

        store.save(&reloaded).await.unwrap();
        assert_eq!(store.load(&builtin).await, overlay);
    }
}
