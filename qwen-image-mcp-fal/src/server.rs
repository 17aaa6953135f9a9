//! MCP server handler for the fal.ai variant.
//!
//! Exposes a single `generate_image` tool. A missing credential degrades the
//! server instead of stopping it: the tool stays listed and every call
//! returns an error block naming the variable to set.

use crate::handler::{FalBackend, GenerateImageToolParams};
use qwen_image_mcp_common::config::Config;
use qwen_image_mcp_common::dispatch::Dispatcher;
use qwen_image_mcp_common::download::ImageDownloader;
use qwen_image_mcp_common::error::Error;
use qwen_image_mcp_common::models::GenerateRequest;
use qwen_image_mcp_common::report;
use rmcp::{
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    ErrorData as McpError, ServerHandler,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, warn};

/// Environment variable holding the fal.ai credential.
pub const CREDENTIAL_VAR: &str = "FAL_KEY";

/// MCP server for Qwen Image generation via fal.ai.
#[derive(Clone)]
pub struct FalImageServer {
    config: Config,
    backend: FalBackend,
    http: reqwest::Client,
}

impl FalImageServer {
    /// Create a server against the production fal.ai endpoint.
    pub fn new(config: Config) -> Self {
        Self::with_backend(config, FalBackend::new())
    }

    /// Create a server with a custom backend (tests, proxies).
    pub fn with_backend(config: Config, backend: FalBackend) -> Self {
        Self {
            config,
            backend,
            http: reqwest::Client::new(),
        }
    }

    /// Run one `generate_image` call end to end.
    ///
    /// Every failure inside the call path becomes a tool error result, never
    /// an McpError: the protocol call itself succeeded, the generation did
    /// not.
    pub async fn generate_image(&self, params: GenerateImageToolParams) -> CallToolResult {
        info!(prompt = %params.prompt, "generate_image called");

        if !self.config.has_credential() {
            let err = Error::MissingCredential(CREDENTIAL_VAR);
            warn!("generate_image called without a configured credential");
            return error_result(&err.to_string(), err.hint());
        }

        let request: GenerateRequest = params.into();
        let dispatcher = Dispatcher::new(&self.backend, &self.http, &self.config);

        let outcome = match dispatcher.generate(&request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "generation failed");
                return error_result(&err.to_string(), err.hint());
            }
        };

        let downloader = ImageDownloader::new(self.http.clone(), &self.config.images_dir);
        let downloads = match downloader
            .download_batch(&request.prompt, &outcome.result.images, &request.output_format)
            .await
        {
            Ok(downloads) => downloads,
            Err(err) => {
                warn!(error = %err, "image materialization failed");
                return CallToolResult::error(vec![Content::text(report::render_unexpected(
                    "fal.ai",
                    &err.to_string(),
                ))]);
            }
        };

        let text = report::render_success(
            "fal.ai",
            &request,
            &outcome.result,
            &downloads,
            outcome.elapsed,
        );
        CallToolResult::success(vec![Content::text(text)])
    }
}

fn error_result(message: &str, hint: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(report::render_failure(
        "fal.ai", message, hint,
    ))])
}

impl ServerHandler for FalImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Qwen Image text-to-image generation server backed by fal.ai. \
                 Use generate_image to create images from a text prompt; generated \
                 files are saved under the images/ directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            use rmcp::model::{ListToolsResult, Tool};
            use schemars::schema_for;

            let schema = schema_for!(GenerateImageToolParams);
            let schema_value = serde_json::to_value(&schema).unwrap_or_default();
            let input_schema = match schema_value {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

            Ok(ListToolsResult {
                tools: vec![Tool {
                    name: Cow::Borrowed("generate_image"),
                    description: Some(Cow::Borrowed(
                        "Generate images from a text prompt using the Qwen Image model \
                         on fal.ai. Downloads the results to the local images/ directory \
                         and returns a summary with file paths and source URLs.",
                    )),
                    input_schema,
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                "generate_image" => {
                    let tool_params: GenerateImageToolParams = params
                        .arguments
                        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
                        .transpose()
                        .map_err(|e| {
                            McpError::invalid_params(format!("Invalid parameters: {}", e), None)
                        })?
                        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))?;

                    Ok(self.generate_image(tool_params).await)
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", params.name),
                    None,
                )),
            }
        }
    }
}
