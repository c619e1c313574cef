use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use toolbridge::chat::chat_loop;
use toolbridge::config::{self, ClientConfig};
use toolbridge::options::ModelOptions;
use toolbridge::providers::Gemini;
use toolbridge::{logging, mcp, McpServer, Session};

#[derive(Parser)]
#[command(name = "toolbridge-client")]
#[command(version, about = "Route free-text queries to MCP tools with Gemini")]
struct Cli {
    /// Path to the MCP server: a .py or .js script, or an executable
    server_script: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    config::load_dotenv()?;
    let config = ClientConfig::from_env()?;
    logging::init(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let llm = Gemini::create_with_base_url(
        config.api_key.clone(),
        config.gemini_base_url.clone(),
        ModelOptions::new(config.model.clone()),
        config.transport_options(),
    )?;

    let service = mcp::connect_stdio(&cli.server_script).await?;
    let tools = service.list_tools().await?;
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    println!("\nConnected to server with tools: {names:?}");

    let mut session = Session::new(llm, service);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let result = chat_loop(&mut session, stdin, &mut stdout).await;

    if let Err(e) = session.into_server().cancel().await {
        tracing::warn!("MCP session did not shut down cleanly: {}", e);
    }

    result.context("Interactive loop failed")
}
