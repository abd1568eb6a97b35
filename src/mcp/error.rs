//! Error taxonomy for MCP server management.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    /// Missing or malformed request field, or a bad server id.
    #[error("{0}")]
    Validation(String),

    /// Server id already taken by a built-in or custom server.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Delete on a built-in or unknown server.
    #[error("{0}")]
    CannotDelete(String),

    #[error("Failed to write MCP server config: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Failed to serialize MCP server config: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type McpResult<T> = Result<T, McpError>;

impl McpError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::CannotDelete(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for McpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("MCP server request failed: {}", self);
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
