//! Operations over the merged built-in + custom server set.
//!
//! Every mutation is a load -> modify -> save round trip against the overlay
//! file. Mutations are serialized behind a single lock so concurrent requests
//! in this process cannot drop each other's writes; reads go straight to the
//! file and take no lock.

use regex::Regex;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;

use super::config::McpConfigStore;
use super::error::{McpError, McpResult};
use super::probe::{ConnectivityProbe, ProbeOutcome};
use super::registry::{project, BuiltinRegistry};
use super::types::{ServerConfig, ServerDescriptor};

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("server id pattern is valid"))
}

/// Check a custom server id: lowercase letters, digits and hyphens only.
pub fn validate_server_id(id: &str) -> McpResult<()> {
    if id_pattern().is_match(id) {
        Ok(())
    } else {
        Err(McpError::Validation(format!(
            "Invalid server id '{}': use lowercase letters, digits and hyphens only",
            id
        )))
    }
}

/// Entry point for listing, mutating and probing MCP servers.
pub struct McpManager {
    store: McpConfigStore,
    builtin: Arc<dyn BuiltinRegistry>,
    probe: ConnectivityProbe,
    write_lock: Mutex<()>,
}

impl McpManager {
    pub fn new(
        store: McpConfigStore,
        builtin: Arc<dyn BuiltinRegistry>,
        probe: ConnectivityProbe,
    ) -> Self {
        Self {
            store,
            builtin,
            probe,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &McpConfigStore {
        &self.store
    }

    /// Built-ins in registry order, then custom servers in overlay order.
    pub async fn list(&self) -> Vec<ServerDescriptor> {
        let overlay = self.store.load(self.builtin.as_ref()).await;
        project(self.builtin.as_ref(), &overlay)
    }

    /// Look up the configuration for an id, built-ins first.
    pub async fn resolve(&self, id: &str) -> Option<ServerConfig> {
        if let Some(config) = self.builtin.get(id) {
            return Some(config.clone());
        }
        let overlay = self.store.load(self.builtin.as_ref()).await;
        overlay.custom.get(id).cloned()
    }

    /// Flip the effective enabled state of `id` and return the new state.
    ///
    /// The id is not checked against the registries; an entry for an unknown
    /// id is stored and ignored when listing.
    pub async fn toggle(&self, id: &str) -> McpResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut overlay = self.store.load(self.builtin.as_ref()).await;

        let enabled = !overlay.is_enabled(id);
        overlay.enabled.insert(id.to_string(), enabled);
        self.store.save(&overlay).await?;

        tracing::info!(server = %id, enabled, "Toggled MCP server");
        Ok(enabled)
    }

    /// Add a custom server. It starts out enabled.
    pub async fn create(&self, id: &str, config: ServerConfig) -> McpResult<()> {
        config.validate()?;
        validate_server_id(id)?;

        let _guard = self.write_lock.lock().await;
        let mut overlay = self.store.load(self.builtin.as_ref()).await;

        if self.builtin.contains(id) || overlay.custom.contains_key(id) {
            return Err(McpError::Conflict(format!("Server '{}' already exists", id)));
        }

        let kind = config.kind();
        overlay.custom.insert(id.to_string(), config);
        overlay.enabled.insert(id.to_string(), true);
        self.store.save(&overlay).await?;

        tracing::info!(server = %id, ?kind, "Created custom MCP server");
        Ok(())
    }

    /// Remove a custom server along with its enabled entry.
    pub async fn delete(&self, id: &str) -> McpResult<()> {
        if self.builtin.contains(id) {
            return Err(McpError::CannotDelete(format!(
                "Cannot delete built-in server '{}'",
                id
            )));
        }

        let _guard = self.write_lock.lock().await;
        let mut overlay = self.store.load(self.builtin.as_ref()).await;

        if overlay.custom.shift_remove(id).is_none() {
            return Err(McpError::CannotDelete(format!(
                "Cannot delete server '{}': not a custom server",
                id
            )));
        }
        overlay.enabled.shift_remove(id);
        self.store.save(&overlay).await?;

        tracing::info!(server = %id, "Deleted custom MCP server");
        Ok(())
    }

    /// Run a connectivity check against one server.
    pub async fn test(&self, id: &str) -> McpResult<ProbeOutcome> {
        let config = self
            .resolve(id)
            .await
            .ok_or_else(|| McpError::NotFound(format!("Server '{}' not found", id)))?;

        let outcome = self.probe.probe(&config).await;
        tracing::debug!(server = %id, success = outcome.success, "Probed MCP server");
        Ok(outcome)
    }
}
