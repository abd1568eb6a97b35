//! Connectivity checks for configured MCP servers.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use super::types::ServerConfig;

/// Result of a connectivity check. A failed check is a normal outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            message: Some(message.into()),
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Probes HTTP servers with a bounded GET; stdio servers are only checked
/// for having a resolvable record and are never spawned.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mcp-manager/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub async fn probe(&self, config: &ServerConfig) -> ProbeOutcome {
        match config {
            ServerConfig::Http { url, headers, .. } => {
                let mut request = self.client.get(url);
                for (key, value) in headers {
                    request = request.header(key.as_str(), value.as_str());
                }

                match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        tracing::debug!("Probe of {} returned {}", url, status);
                        let code = status.as_u16();
                        if is_reachable_status(status) {
                            ProbeOutcome::ok(format!("Server reachable (HTTP {})", code))
                        } else {
                            ProbeOutcome::failed(format!("Server returned HTTP {}", code))
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Probe of {} failed: {}", url, e);
                        if e.is_timeout() {
                            ProbeOutcome::failed(format!(
                                "Request timed out after {:?}",
                                self.timeout
                            ))
                        } else if e.is_connect() {
                            ProbeOutcome::failed(format!("Connection failed: {}", e))
                        } else {
                            ProbeOutcome::failed(format!("Request failed: {}", e))
                        }
                    }
                }
            }
            // TODO: resolve the command on PATH once stdio validation is in scope.
            ServerConfig::Stdio { command, .. } => ProbeOutcome::ok(format!(
                "Stdio server configured with command '{}' (not started)",
                command
            )),
        }
    }
}

/// 404 and 405 count as reachable: many MCP endpoints reject plain GETs.
fn is_reachable_status(status: StatusCode) -> bool {
    status.is_success()
        || status == StatusCode::NOT_FOUND
        || status == StatusCode::METHOD_NOT_ALLOWED
}
