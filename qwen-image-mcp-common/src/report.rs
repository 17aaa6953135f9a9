//! Response formatter: renders the user-facing text summary of one call.
//!
//! A deterministic template over the request, the platform result, and the
//! per-image download status. No state.

use crate::models::{DownloadedImage, GenerateRequest, GenerationResult};
use std::fmt::Write as _;
use std::time::Duration;

/// Render the success summary returned by the `generate_image` tool.
pub fn render_success(
    backend: &str,
    request: &GenerateRequest,
    result: &GenerationResult,
    downloads: &[DownloadedImage],
    elapsed: Duration,
) -> String {
    let total = downloads.len();
    let succeeded = downloads.iter().filter(|d| d.succeeded()).count();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Successfully generated {} image(s) in {:.1}s via {}.",
        result.images.len(),
        elapsed.as_secs_f64(),
        backend
    );
    out.push('\n');

    let _ = writeln!(out, "Parameters:");
    let _ = writeln!(out, "  prompt: {}", request.prompt);
    let _ = writeln!(out, "  size: {}", request.size);
    let _ = writeln!(out, "  steps: {}", request.num_inference_steps);
    let _ = writeln!(out, "  guidance_scale: {}", request.guidance_scale);
    if !request.negative_prompt.is_empty() {
        let _ = writeln!(out, "  negative_prompt: {}", request.negative_prompt);
    }
    if let Some(seed) = result.seed.or(request.seed) {
        let _ = writeln!(out, "  seed: {seed}");
    }
    if let Some(request_id) = &result.request_id {
        let _ = writeln!(out, "  request_id: {request_id}");
    }
    out.push('\n');

    let _ = writeln!(out, "Images:");
    for (index, download) in downloads.iter().enumerate() {
        match &download.local_path {
            Some(path) => {
                let _ = writeln!(out, "  {}. {} ({})", index + 1, path.display(), download.url);
            }
            None => {
                let _ = writeln!(out, "  {}. Download failed ({})", index + 1, download.url);
            }
        }
    }
    let _ = writeln!(out, "\n{succeeded} of {total} images downloaded.");

    if let Some(flags) = &result.nsfw_flags {
        if flags.iter().any(|&flagged| flagged) {
            let _ = writeln!(
                out,
                "\nWarning: one or more images were flagged by the content safety checker."
            );
        }
    }

    out
}

/// Render the user-facing error block for a failed call.
///
/// `hint` is the kind-specific remediation text attached by the error type.
pub fn render_failure(backend: &str, message: &str, hint: &str) -> String {
    format!(
        "Image generation via {backend} failed.\n\nError: {message}\n\nHint: {hint}"
    )
}

/// Generic troubleshooting block for unexpected errors in the call path.
pub fn render_unexpected(backend: &str, message: &str) -> String {
    format!(
        "Image generation via {backend} failed unexpectedly.\n\n\
         Error: {message}\n\n\
         Troubleshooting:\n\
         - Verify the API credential environment variable is set and valid\n\
         - Check your network connection\n\
         - Check the platform status page\n\
         - Retry with default parameters"
    )
}
