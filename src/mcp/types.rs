//! Types for MCP server configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::McpError;

/// Connection parameters for a single MCP server.
///
/// Serialized with a `type` tag so records read the same way in the
/// built-in registry file and in the overlay's `custom` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerConfig {
    Http {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
    Stdio {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
    },
}

impl ServerConfig {
    /// Explicit display name, if one is set and non-empty.
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Self::Http { name, .. } | Self::Stdio { name, .. } => name.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty())
    }

    pub fn kind(&self) -> ServerKind {
        match self {
            Self::Http { .. } => ServerKind::Http,
            Self::Stdio { .. } => ServerKind::Stdio,
        }
    }

    /// Check the field each transport cannot work without.
    pub fn validate(&self) -> Result<(), McpError> {
        match self {
            Self::Http { url, .. } if url.trim().is_empty() => Err(McpError::Validation(
                "url is required for http servers".to_string(),
            )),
            Self::Stdio { command, .. } if command.trim().is_empty() => Err(
                McpError::Validation("command is required for stdio servers".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Transport tag of a server, as exposed to API consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Http,
    Stdio,
}

/// Persisted user state layered over the built-in registry.
///
/// `custom` never holds a built-in id. `enabled` may carry entries for ids
/// that no longer exist; they are ignored when listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRecord {
    #[serde(default)]
    pub enabled: IndexMap<String, bool>,
    #[serde(default)]
    pub custom: IndexMap<String, ServerConfig>,
}

impl OverlayRecord {
    /// Overlay used when nothing has been persisted yet: every built-in
    /// enabled, no custom servers.
    pub fn with_builtins<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            enabled: ids.into_iter().map(|id| (id.to_string(), true)).collect(),
            custom: IndexMap::new(),
        }
    }

    /// Effective enabled state; servers without an entry are enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.get(id).copied().unwrap_or(true)
    }
}

/// Merged view of one server returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ServerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub enabled: bool,
    pub builtin: bool,
}

impl ServerDescriptor {
    pub(crate) fn new(
        id: &str,
        name: String,
        config: &ServerConfig,
        enabled: bool,
        builtin: bool,
    ) -> Self {
        let (url, command, args) = match config {
            ServerConfig::Http { url, .. } => (Some(url.clone()), None, Vec::new()),
            ServerConfig::Stdio { command, args, .. } => {
                (None, Some(command.clone()), args.clone())
            }
        };
        Self {
            id: id.to_string(),
            name,
            kind: config.kind(),
            url,
            command,
            args,
            enabled,
            builtin,
        }
    }
}

/// Body of `POST /api/mcp-servers`.
///
/// Everything is optional at the wire level so that missing fields surface
/// as validation errors instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateServerRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub server_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

impl CreateServerRequest {
    /// Split the request into an id and a typed server record.
    pub fn into_parts(self) -> Result<(String, ServerConfig), McpError> {
        let id = self.id.map(|s| s.trim().to_string()).unwrap_or_default();
        let server_type = self
            .server_type
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if id.is_empty() || server_type.is_empty() {
            return Err(McpError::Validation("id and type are required".to_string()));
        }

        let name = self.name.filter(|n| !n.trim().is_empty());
        let config = match server_type.as_str() {
            "http" => ServerConfig::Http {
                name,
                url: self.url.unwrap_or_default(),
                headers: self.headers.unwrap_or_default(),
            },
            "stdio" => ServerConfig::Stdio {
                name,
                command: self.command.unwrap_or_default(),
                args: self.args.unwrap_or_default(),
                env: self.env.unwrap_or_default(),
            },
            other => {
                return Err(McpError::Validation(format!(
                    "Unsupported server type: {}",
                    other
                )))
            }
        };
        config.validate()?;

        Ok((id, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_tagged_json() {
        let json = r#"{"type":"stdio","command":"npx","args":["-y","server-git"]}"#;
        let config: ServerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.kind(), ServerKind::Stdio);
        assert_eq!(config.name(), None);
        match config {
            ServerConfig::Stdio { command, args, env, .. } => {
                assert_eq!(command, "npx");
                assert_eq!(args, vec!["-y", "server-git"]);
                assert!(env.is_empty());
            }
            other => panic!("expected stdio config, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let config = ServerConfig::Http {
            name: Some("  ".to_string()),
            url: "https://example.com/mcp".to_string(),
            headers: BTreeMap::new(),
        };
        assert_eq!(config.name(), None);
    }

    #[test]
    fn test_overlay_defaults_to_enabled() {
        let mut overlay = OverlayRecord::with_builtins(["git", "fetch"]);
        overlay.enabled.insert("fetch".to_string(), false);

        assert!(overlay.is_enabled("git"));
        assert!(!overlay.is_enabled("fetch"));
        assert!(overlay.is_enabled("never-seen"));
        assert!(overlay.custom.is_empty());
    }

    #[test]
    fn test_overlay_tolerates_missing_sections() {
        let overlay: OverlayRecord = serde_json::from_str("{}").unwrap();
        assert!(overlay.enabled.is_empty());
        assert!(overlay.custom.is_empty());
    }

    #[test]
    fn test_create_request_http() {
        let req: CreateServerRequest = serde_json::from_value(serde_json::json!({
            "id": "my-tool",
            "type": "http",
            "url": "https://x",
            "headers": {"Authorization": "Bearer t"}
        }))
        .unwrap();

        let (id, config) = req.into_parts().unwrap();
        assert_eq!(id, "my-tool");
        match config {
            ServerConfig::Http { url, headers, name } => {
                assert_eq!(url, "https://x");
                assert_eq!(headers.get("Authorization").unwrap(), "Bearer t");
                assert!(name.is_none());
            }
            other => panic!("expected http config, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_missing_fields() {
        let missing_type = CreateServerRequest {
            id: Some("tool".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing_type.into_parts(),
            Err(McpError::Validation(_))
        ));

        let missing_url = CreateServerRequest {
            id: Some("tool".to_string()),
            server_type: Some("http".to_string()),
            ..Default::default()
        };
        let err = missing_url.into_parts().unwrap_err();
        assert!(err.to_string().contains("url is required"));

        let missing_command = CreateServerRequest {
            id: Some("tool".to_string()),
            server_type: Some("stdio".to_string()),
            ..Default::default()
        };
        let err = missing_command.into_parts().unwrap_err();
        assert!(err.to_string().contains("command is required"));
    }

    #[test]
    fn test_create_request_unknown_type() {
        let req = CreateServerRequest {
            id: Some("tool".to_string()),
            server_type: Some("sse".to_string()),
            url: Some("https://x".to_string()),
            ..Default::default()
        };
        let err = req.into_parts().unwrap_err();
        assert!(err.to_string().contains("Unsupported server type: sse"));
    }
}
