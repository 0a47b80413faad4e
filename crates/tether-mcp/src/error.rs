//! Error types for tool-server sessions.

use thiserror::Error;

/// Errors from tool-server communication.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Unsupported server script '{path}': must be a .py or .js file")]
    UnsupportedServerKind { path: String },

    #[error("Failed to spawn tool server '{path}': {source}")]
    SpawnFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("MCP handshake failed: {0}")]
    Handshake(String),

    #[error("MCP request failed: {0}")]
    Request(String),
}
