//! Fault taxonomy and the single point where faults become text.

use log::error;
use thiserror::Error;

use crate::platform::RemoteError;
use crate::protocol::ToolResult;

pub const PERMISSION_DENIED_TEXT: &str =
    "Bot lacks permission to perform this action. Please check its roles and permissions in the server.";

pub const NOT_FOUND_TEXT: &str =
    "Resource not found. Please check the provided IDs (e.g., server_id, channel_id, user_id).";

/// Every way a tool call can fail.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Discord client not ready")]
    ClientNotReady,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidArgument(message.into())
    }

    /// Caller-facing text. Remote detail is withheld for permission and
    /// lookup failures.
    pub fn render(&self) -> String {
        match self {
            ToolError::ClientNotReady => {
                "Discord client not ready. The bot is still connecting; retry shortly.".to_string()
            }
            ToolError::UnknownTool(name) => format!("Unknown tool: {}", name),
            ToolError::PermissionDenied(_) => PERMISSION_DENIED_TEXT.to_string(),
            ToolError::ResourceNotFound(_) => NOT_FOUND_TEXT.to_string(),
            ToolError::InvalidArgument(msg) => format!("Value error: {}", msg),
            ToolError::Unexpected(msg) => format!("An unexpected error occurred: {}", msg),
        }
    }
}

impl From<RemoteError> for ToolError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Forbidden(msg) => ToolError::PermissionDenied(msg),
            RemoteError::NotFound(msg) => ToolError::ResourceNotFound(msg),
            RemoteError::Other(msg) => ToolError::Unexpected(msg),
        }
    }
}

/// Convert a fault from `tool` into its single-block result.
///
/// Only unexpected faults are logged.
pub fn normalize(tool: &str, err: &ToolError) -> ToolResult {
    if let ToolError::Unexpected(detail) = err {
        error!("Error in tool {}: {}", tool, detail);
    }
    ToolResult::failure(err.render())
}
