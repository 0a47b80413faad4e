//! Tool-server runtime detection.

use std::path::Path;

use crate::error::McpError;

/// The interpreter used to launch a tool-server script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Python,
    Node,
}

impl ServerKind {
    /// Detect the runtime from a script path's extension.
    ///
    /// Matching is case-sensitive: `.py` and `.js` are recognized, anything
    /// else is an unsupported server kind.
    pub fn from_path(path: &Path) -> Result<Self, McpError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("py") => Ok(ServerKind::Python),
            Some("js") => Ok(ServerKind::Node),
            _ => Err(McpError::UnsupportedServerKind {
                path: path.display().to_string(),
            }),
        }
    }

    /// The interpreter command for this runtime.
    pub fn command(&self) -> &'static str {
        match self {
            ServerKind::Python => "python",
            ServerKind::Node => "node",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_script_detected() {
        let kind = ServerKind::from_path(Path::new("weather/server.py")).unwrap();
        assert_eq!(kind, ServerKind::Python);
        assert_eq!(kind.command(), "python");
    }

    #[test]
    fn node_script_detected() {
        let kind = ServerKind::from_path(Path::new("/srv/tools.js")).unwrap();
        assert_eq!(kind, ServerKind::Node);
        assert_eq!(kind.command(), "node");
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = ServerKind::from_path(Path::new("server.sh")).unwrap_err();
        match err {
            McpError::UnsupportedServerKind { path } => assert_eq!(path, "server.sh"),
            other => panic!("Expected UnsupportedServerKind, got: {other:?}"),
        }
    }

    #[test]
    fn missing_extension_rejected() {
        let err = ServerKind::from_path(Path::new("server")).unwrap_err();
        assert!(matches!(err, McpError::UnsupportedServerKind { .. }));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let err = ServerKind::from_path(Path::new("server.PY")).unwrap_err();
        assert!(matches!(err, McpError::UnsupportedServerKind { .. }));
    }
}
