//! Qwen Image MCP server binary, fal.ai variant.

use anyhow::Result;
use clap::Parser;
use qwen_image_mcp_fal::server::CREDENTIAL_VAR;
use qwen_image_mcp_fal::FalImageServer;
use qwen_image_mcp_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the fal.ai server.
#[derive(Parser, Debug)]
#[command(name = "qwen-image-mcp-fal")]
#[command(about = "MCP server for Qwen Image generation via fal.ai")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    qwen_image_mcp_common::tracing::init_tracing();

    tracing::info!("qwen-image-mcp-fal server starting...");

    let args = Args::parse();

    let config = Config::from_env(&[CREDENTIAL_VAR, "FAL_API_KEY"])?;
    if !config.has_credential() {
        tracing::warn!(
            "{} is not set; running degraded, tool calls will return an error",
            CREDENTIAL_VAR
        );
    }
    tracing::info!(
        environment = %config.environment,
        timeout_ms = config.request_timeout.map(|t| t.as_millis() as u64),
        "Configuration loaded"
    );

    let server = FalImageServer::new(config);

    let transport = args.transport.into_transport();
    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
