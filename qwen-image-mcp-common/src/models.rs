//! Request and result records shared by both server variants.
//!
//! All of these are created per tool invocation and discarded once the
//! response is rendered; nothing persists across calls beyond files left in
//! the images directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum number of images per request.
pub const MIN_NUM_IMAGES: u32 = 1;

/// Maximum number of images per request.
pub const MAX_NUM_IMAGES: u32 = 4;

/// A fully-defaulted, validated image generation request.
///
/// Fields map onto the Qwen Image parameter surface; `output_format`,
/// `acceleration`, and `sync_mode` are honored by the fal.ai backend only and
/// ignored by Replicate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// Text prompt describing the image to generate.
    pub prompt: String,

    /// Image size or aspect ratio, platform-specific enum.
    pub size: String,

    /// Number of denoising steps.
    ///
    /// Wider than any platform's legal range so out-of-range caller values
    /// survive deserialization and reach validation, which names the range.
    pub num_inference_steps: i64,

    /// How strictly the output must follow the prompt.
    pub guidance_scale: f64,

    /// Random seed for reproducible generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// What to avoid in the generated image.
    #[serde(default)]
    pub negative_prompt: String,

    /// Number of images to generate (1-4).
    pub num_images: u32,

    /// Whether the platform safety checker runs on the output.
    pub enable_safety_checker: bool,

    /// Output format: "png" or "jpeg" (fal.ai only).
    pub output_format: String,

    /// Quality/speed trade-off: "none", "regular", or "high" (fal.ai only).
    pub acceleration: String,

    /// Wait for the image bytes in the response instead of URLs (fal.ai only).
    pub sync_mode: bool,
}

/// One image produced by the platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratedImage {
    /// Source URL on the platform's CDN.
    pub url: String,
    /// Pixel width, when the platform reports it.
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height, when the platform reports it.
    #[serde(default)]
    pub height: Option<u32>,
    /// MIME type, when the platform reports it.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// The parsed outcome of one platform call.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Produced images, in platform order.
    pub images: Vec<GeneratedImage>,
    /// Seed the platform actually used.
    pub seed: Option<i64>,
    /// Platform-assigned request identifier.
    pub request_id: Option<String>,
    /// Per-image NSFW flags, aligned by index with `images`.
    pub nsfw_flags: Option<Vec<bool>>,
}

/// One result image plus its local download status.
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    /// Source URL, preserved even when the download failed.
    pub url: String,
    /// Local file path; `None` when the download was skipped or failed.
    pub local_path: Option<PathBuf>,
}

impl DownloadedImage {
    /// Whether the image made it to local disk.
    pub fn succeeded(&self) -> bool {
        self.local_path.is_some()
    }
}
