//! tether — a command-line MCP chat client for Azure OpenAI deployments.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tether_api::ApiClient;
use tether_config::{COMPLETION_TEMPERATURE, MAX_COMPLETION_TOKENS, Settings};
use tether_mcp::ToolSession;
use tether_types::{ChatMessage, ChatRequest};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(
    name = "tether",
    version,
    about = "Chat with an Azure OpenAI deployment through an MCP tool server"
)]
struct Cli {
    /// Path to the tool-server script (.py or .js)
    server_script: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    // A missing path is a usage error with exit status 1, not a parse error
    let Some(script) = cli.server_script else {
        eprintln!("Usage: tether <path_to_server_script>");
        std::process::exit(1);
    };

    let settings = Settings::load();
    let client = ApiClient::new(&settings.api_key, &settings.endpoint, &settings.deployment)
        .context("Failed to create API client")?;

    let session = ToolSession::connect(&script)
        .await
        .context("Failed to connect to tool server")?;

    let names: Vec<&str> = session.tools().iter().map(|t| t.name.as_str()).collect();
    eprintln!("Connected to server with tools: {}", names.join(", "));

    // The session must be shut down on every exit path, including a loop error
    let result = chat_loop(&client, &session, &settings.deployment).await;
    session.shutdown().await;
    result
}

/// Run the interactive query loop until `quit` or end of input.
async fn chat_loop(client: &ApiClient, session: &ToolSession, deployment: &str) -> Result<()> {
    eprintln!(
        "tether v{} (deployment: {})",
        env!("CARGO_PKG_VERSION"),
        if deployment.is_empty() { "unset" } else { deployment }
    );
    eprintln!("Type your queries or 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("\nQuery: ");
        io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            eprintln!();
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_quit(query) {
            break;
        }

        match process_query(client, session, query).await {
            Ok(reply) => println!("\n{reply}"),
            Err(e) => eprintln!("\nError: {e}"),
        }
    }

    Ok(())
}

/// Dispatch one query: refresh the tool catalog, send a single-message
/// completion request, and return the first choice's text.
async fn process_query(client: &ApiClient, session: &ToolSession, query: &str) -> Result<String> {
    let tools = session.list_tools().await?;
    tracing::debug!("Server reports {} tools", tools.len());

    let request = ChatRequest {
        messages: vec![ChatMessage::user(query)],
        max_tokens: MAX_COMPLETION_TOKENS,
        temperature: COMPLETION_TEMPERATURE,
    };

    let response = client.complete(&request).await?;
    response
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Response contained no completion text"))
}

/// True when the trimmed input is the quit sentinel, in any letter case.
fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("quit")
}
