//! Tool-server session: spawn, handshake, discovery, teardown.

use std::path::Path;

use rmcp::{
    RoleClient, ServiceExt,
    service::RunningService,
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use tokio::process::Command;

use crate::error::McpError;
use crate::runtime::ServerKind;

/// Information about a tool exposed by a tool server.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// One live connection to a tool-server subprocess.
///
/// Owns the running MCP service for the lifetime of the session. The
/// subprocess is killed if the session is dropped; [`ToolSession::shutdown`]
/// is the orderly path and consumes the session, so it can only run once.
pub struct ToolSession {
    service: RunningService<RoleClient, ()>,
    tools: Vec<ToolInfo>,
}

impl ToolSession {
    /// Connect to a tool server: detect the runtime from the script
    /// extension, spawn the script as a subprocess, perform the MCP
    /// initialize handshake, and discover its tools.
    ///
    /// Fails with [`McpError::UnsupportedServerKind`], before anything is
    /// spawned, if the path is not a recognized script.
    pub async fn connect(path: &Path) -> Result<Self, McpError> {
        let kind = ServerKind::from_path(path)?;

        tracing::debug!("Launching tool server: {} {}", kind.command(), path.display());

        let transport = TokioChildProcess::new(Command::new(kind.command()).configure(|cmd| {
            cmd.arg(path);
        }))
        .map_err(|source| McpError::SpawnFailed {
            path: path.display().to_string(),
            source,
        })?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| McpError::Handshake(e.to_string()))?;

        let tools = match fetch_tools(&service).await {
            Ok(tools) => tools,
            Err(e) => {
                // Tear the half-open session down before reporting the failure
                if let Err(cancel_err) = service.cancel().await {
                    tracing::debug!("Tool server teardown after failed discovery: {cancel_err}");
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Tool server '{}' connected with {} tools",
            path.display(),
            tools.len()
        );

        Ok(Self { service, tools })
    }

    /// The tool catalog discovered at connect time, in server order.
    pub fn tools(&self) -> &[ToolInfo] {
        &self.tools
    }

    /// Fetch a fresh tool catalog from the server.
    pub async fn list_tools(&self) -> Result<Vec<ToolInfo>, McpError> {
        fetch_tools(&self.service).await
    }

    /// Shut down the session: close the channel and reap the subprocess.
    pub async fn shutdown(self) {
        if let Err(e) = self.service.cancel().await {
            tracing::debug!("Tool server shutdown: {e}");
        }
    }
}

/// Issue a `tools/list` request and convert the catalog entries.
async fn fetch_tools(service: &RunningService<RoleClient, ()>) -> Result<Vec<ToolInfo>, McpError> {
    let result = service
        .list_tools(Default::default())
        .await
        .map_err(|e| McpError::Request(e.to_string()))?;

    Ok(result
        .tools
        .into_iter()
        .map(|tool| ToolInfo {
            name: tool.name.to_string(),
            description: tool.description.map(|d| d.to_string()).unwrap_or_default(),
            input_schema: serde_json::Value::Object(tool.input_schema.as_ref().clone()),
        })
        .collect())
}
