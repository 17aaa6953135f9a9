//! Workspace-level integration tests for the Qwen Image MCP servers.
//!
//! These tests verify:
//! - Each server variant starts and reports correct server info
//! - Tool registration and schema generation
//! - Parameter validation behaves the same way on both variants
//! - Tool results follow the MCP content format

pub mod server_startup;
pub mod tool_schema;
pub mod input_validation;
pub mod output_format;
