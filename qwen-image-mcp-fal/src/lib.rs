//! Qwen Image MCP server, fal.ai variant.
//!
//! Exposes the `generate_image` tool backed by the `fal-ai/qwen-image`
//! endpoint on fal.run.

pub mod handler;
pub mod server;

pub use handler::{FalBackend, GenerateImageToolParams};
pub use server::FalImageServer;
