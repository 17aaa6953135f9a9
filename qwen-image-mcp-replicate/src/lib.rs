//! Qwen Image MCP server, Replicate variant.
//!
//! Exposes the `generate_image` tool backed by the `qwen/qwen-image` model
//! on Replicate's synchronous predictions API.

pub mod handler;
pub mod server;

pub use handler::{GenerateImageToolParams, ReplicateBackend};
pub use server::ReplicateImageServer;
