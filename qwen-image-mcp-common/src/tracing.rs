//! Tracing initialization for the Qwen Image MCP servers.
//!
//! Log level is controlled by `RUST_LOG` through `EnvFilter`, e.g.
//! `RUST_LOG=debug` or `RUST_LOG=warn,qwen_image_mcp_common=debug`.
//! All output goes to stderr: on the stdio transport stdout carries the
//! JSON-RPC stream.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Initialize the tracing subscriber with environment-based filtering.
///
/// # Panics
/// Panics if a global subscriber was already set; use [`try_init_tracing`]
/// when initialization may race (tests).
pub fn init_tracing() {
    init_tracing_with_default("info")
}

/// Like [`init_tracing`] but with a custom default level when `RUST_LOG`
/// is not set.
pub fn init_tracing_with_default(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer())
        .init();
}

/// Fallible initialization for contexts where the subscriber may already be
/// set. Returns `Err(())` in that case instead of panicking.
pub fn try_init_tracing() -> Result<(), ()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer())
        .try_init()
        .map_err(|_| ())
}

fn fmt_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
}
