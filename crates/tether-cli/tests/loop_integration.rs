//! End-to-end tests for the interactive loop, driving the compiled binary
//! over stdin with a stub tool server. Nothing here talks to a real
//! endpoint: the API address points at a port with nothing listening, so a
//! query fails fast and exercises the per-query error path.
//!
//! Tests that need a tool server skip themselves when `python` is not on
//! the PATH.

use std::io::Write;
use std::net::TcpListener;
use std::process::{Command, Stdio};

/// A minimal MCP server speaking newline-delimited JSON-RPC over stdio.
/// Echoes back whatever protocol version the client asks for and
/// advertises two tools.
const STUB_SERVER: &str = r#"
import json
import sys

def send(msg):
    sys.stdout.write(json.dumps(msg) + "\n")
    sys.stdout.flush()

for line in sys.stdin:
    line = line.strip()
    if not line:
        continue
    req = json.loads(line)
    method = req.get("method", "")
    if method == "initialize":
        send({
            "jsonrpc": "2.0",
            "id": req["id"],
            "result": {
                "protocolVersion": req["params"]["protocolVersion"],
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "stub-server", "version": "0.0.1"},
            },
        })
    elif method == "tools/list":
        send({
            "jsonrpc": "2.0",
            "id": req["id"],
            "result": {
                "tools": [
                    {
                        "name": "search",
                        "description": "Search the web",
                        "inputSchema": {"type": "object", "properties": {}},
                    },
                    {
                        "name": "fetch",
                        "description": "Fetch a URL",
                        "inputSchema": {"type": "object", "properties": {}},
                    },
                ],
            },
        })
    elif "id" in req:
        send({"jsonrpc": "2.0", "id": req["id"], "result": {}})
"#;

fn python_available() -> bool {
    Command::new("python").arg("--version").output().is_ok()
}

/// An endpoint with nothing behind it: bind an ephemeral port, then drop
/// the listener so connections are refused immediately.
fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind port");
    let port = listener.local_addr().expect("local addr").port();
    format!("http://127.0.0.1:{port}")
}

// ---------------------------------------------------------------------------
// Test: a failing query prints one error and the loop keeps accepting input
// ---------------------------------------------------------------------------

#[test]
fn failing_query_reports_error_and_loop_continues() {
    if !python_available() {
        // Skip test if python is not available
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("server.py");
    std::fs::write(&script, STUB_SERVER).expect("write stub");

    let mut child = Command::new(env!("CARGO_BIN_EXE_tether"))
        .arg(&script)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("AZURE_OPENAI_KEY", "test-key")
        .env("AZURE_OPENAI_ENDPOINT", closed_endpoint())
        .env("DEPLOYMENT_NAME", "test-deployment")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tether");

    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(b"hello\nquit\n")
        .expect("write queries");
    let output = child.wait_with_output().expect("wait for tether");

    assert!(output.status.success(), "expected clean exit, got {:?}", output.status);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Connected to server with tools: search, fetch"), "stderr: {stderr}");
    assert_eq!(stderr.matches("Error:").count(), 1, "stderr: {stderr}");

    // The prompt comes back after the failure.
    let after_error = &stderr[stderr.find("Error:").expect("error line")..];
    assert!(after_error.contains("Query: "), "stderr: {stderr}");

    // No reply was printed for the failed query.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().is_empty(), "stdout: {stdout}");
}

// ---------------------------------------------------------------------------
// Test: a missing script argument is a usage error with status 1
// ---------------------------------------------------------------------------

#[test]
fn missing_argument_prints_usage_and_exits_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_tether"))
        .output()
        .expect("run tether");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: tether <path_to_server_script>"));
}
