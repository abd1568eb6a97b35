//! Process configuration.
//!
//! Read once from environment variables at startup:
//! - `HOST` / `PORT` - bind address (default `127.0.0.1:3000`)
//! - `WORKING_DIR` - base directory for state (default: current directory)
//! - `MCP_SERVERS_CONFIG` - overlay file
//!   (default `{WORKING_DIR}/.mcp-manager/mcp-servers.json`)
//! - `MCP_BUILTIN_REGISTRY` - built-in server registry
//!   (default `{WORKING_DIR}/.mcp-manager/builtin-servers.json`)
//! - `MCP_PROBE_TIMEOUT_SECS` - connectivity probe timeout (default 5)

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const STATE_DIR: &str = ".mcp-manager";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to resolve working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub working_dir: PathBuf,
    /// Overlay file with enabled flags and custom servers.
    pub servers_config_path: PathBuf,
    /// JSON object of built-in servers, read once at startup.
    pub builtin_registry_path: PathBuf,
    pub probe_timeout: Duration,
}

impl Config {
    /// Defaults rooted at `working_dir`.
    pub fn for_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let state_dir = working_dir.join(STATE_DIR);
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            servers_config_path: state_dir.join("mcp-servers.json"),
            builtin_registry_path: state_dir.join("builtin-servers.json"),
            working_dir,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let working_dir = match lookup("WORKING_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };
        let mut config = Self::for_working_dir(working_dir);

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(path) = lookup("MCP_SERVERS_CONFIG") {
            config.servers_config_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("MCP_BUILTIN_REGISTRY") {
            config.builtin_registry_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("MCP_PROBE_TIMEOUT_SECS") {
            let secs: u64 = parse_number("MCP_PROBE_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "MCP_PROBE_TIMEOUT_SECS",
                    value: secs.to_string(),
                });
            }
            config.probe_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
