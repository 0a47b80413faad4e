//! MCP (Model Context Protocol) tool-server sessions for tether.
//!
//! Spawns a stdio tool server as a child process under the interpreter its
//! script extension names, drives the MCP handshake and tool discovery
//! through the rmcp client, and reaps the subprocess when the session ends.

pub mod error;
pub mod runtime;
pub mod session;

pub use error::McpError;
pub use runtime::ServerKind;
pub use session::{ToolInfo, ToolSession};
