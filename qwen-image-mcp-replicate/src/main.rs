//! Qwen Image MCP server binary, Replicate variant.

use anyhow::Result;
use clap::Parser;
use qwen_image_mcp_common::{Config, McpServerBuilder, TransportArgs};
use qwen_image_mcp_replicate::server::CREDENTIAL_VAR;
use qwen_image_mcp_replicate::ReplicateImageServer;

/// Command-line arguments for the Replicate server.
#[derive(Parser, Debug)]
#[command(name = "qwen-image-mcp-replicate")]
#[command(about = "MCP server for Qwen Image generation via Replicate")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    qwen_image_mcp_common::tracing::init_tracing();

    tracing::info!("qwen-image-mcp-replicate server starting...");

    let args = Args::parse();

    // The Prefer: wait call already blocks server-side, so no client timeout
    // race is layered on top.
    let config = Config::from_env(&[CREDENTIAL_VAR, "REPLICATE_API_KEY"])?.without_timeout();
    if !config.has_credential() {
        tracing::warn!(
            "{} is not set; running degraded, tool calls will return an error",
            CREDENTIAL_VAR
        );
    }
    tracing::info!(
        environment = %config.environment,
        "Configuration loaded"
    );

    let server = ReplicateImageServer::new(config);
    let transport = args.transport.into_transport();

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
