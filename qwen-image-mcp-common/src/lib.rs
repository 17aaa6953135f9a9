//! Qwen Image MCP Common Library
//!
//! Shared core for the fal.ai and Replicate Qwen Image MCP servers:
//! configuration, error handling, the inference backend trait, generation
//! dispatch, image download, response formatting, and server/transport glue.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod error;
pub mod models;
pub mod report;
pub mod server;
pub mod tracing;
pub mod transport;


pub use backend::{InferenceBackend, ValidationError};
pub use config::Config;
pub use dispatch::{Dispatcher, GenerationOutcome};
pub use download::ImageDownloader;
pub use error::{ApiErrorKind, ConfigError, Error, Result};
pub use models::{DownloadedImage, GeneratedImage, GenerateRequest, GenerationResult};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
