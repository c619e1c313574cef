use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

use toolbridge::backend::BackendClient;
use toolbridge::config::{self, ServerConfig};
use toolbridge::logging;
use toolbridge::server::{RagTools, SERVER_NAME};

#[derive(Parser)]
#[command(name = "toolbridge-server")]
#[command(version, about = "MCP server exposing the RAG login and query tools over stdio")]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    config::load_dotenv()?;
    let config = ServerConfig::from_env()?;
    logging::init(&config.log_file)?;

    let backend = BackendClient::new(config.rag_api_url.clone(), config.transport_options())?;
    tracing::info!(
        "Starting {} MCP server, backend at {}",
        SERVER_NAME,
        backend.base_url()
    );

    let service = RagTools::new(backend)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start MCP server: {:?}", e))?;

    let reason = service.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", reason);
    Ok(())
}
