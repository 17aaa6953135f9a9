//! fal.ai backend for Qwen Image generation.
//!
//! This module provides the [`FalBackend`] inference adapter and the tool
//! parameter types for the `generate_image` tool, targeting the
//! `fal-ai/qwen-image` endpoint on fal.run.

use async_trait::async_trait;
use qwen_image_mcp_common::backend::{post_json, InferenceBackend, ValidationError};
use qwen_image_mcp_common::error::{ApiErrorKind, Error};
use qwen_image_mcp_common::models::{GenerateRequest, GeneratedImage, GenerationResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Qwen Image endpoint on fal.run.
pub const FAL_ENDPOINT: &str = "https://fal.run/fal-ai/qwen-image";

/// Valid image sizes for the fal.ai Qwen Image model.
pub const VALID_IMAGE_SIZES: &[&str] = &[
    "square_hd",
    "square",
    "portrait_4_3",
    "portrait_16_9",
    "landscape_4_3",
    "landscape_16_9",
];

/// Valid output formats.
pub const VALID_OUTPUT_FORMATS: &[&str] = &["png", "jpeg"];

/// Valid acceleration levels (quality/speed trade-off).
pub const VALID_ACCELERATIONS: &[&str] = &["none", "regular", "high"];

/// Inference step bounds.
pub const MIN_STEPS: i64 = 2;
pub const MAX_STEPS: i64 = 50;

/// Guidance scale bounds.
pub const MIN_GUIDANCE: f64 = 0.0;
pub const MAX_GUIDANCE: f64 = 20.0;

/// Defaults applied to absent optional tool parameters.
pub const DEFAULT_IMAGE_SIZE: &str = "landscape_4_3";
pub const DEFAULT_STEPS: i64 = 30;
pub const DEFAULT_GUIDANCE: f64 = 2.5;
pub const DEFAULT_OUTPUT_FORMAT: &str = "png";
pub const DEFAULT_ACCELERATION: &str = "none";

/// Tool parameters for `generate_image` (fal.ai variant).
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    pub prompt: String,
    /// Image size: square_hd, square, portrait_4_3, portrait_16_9,
    /// landscape_4_3, landscape_16_9 (default: landscape_4_3)
    #[serde(default)]
    pub image_size: Option<String>,
    /// Number of inference steps, 2-50 (default: 30)
    ///
    /// Deserialized wide so an out-of-range value is rejected by validation
    /// with the legal range, not by the deserializer with a type error.
    #[serde(default)]
    pub num_inference_steps: Option<i64>,
    /// Guidance scale, 0-20 (default: 2.5)
    #[serde(default)]
    pub guidance_scale: Option<f64>,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<i64>,
    /// What to avoid in the generated image
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Number of images to generate, 1-4 (default: 1)
    #[serde(default)]
    pub num_images: Option<u32>,
    /// Run the platform safety checker on the output (default: true)
    #[serde(default)]
    pub enable_safety_checker: Option<bool>,
    /// Output format: png or jpeg (default: png)
    #[serde(default)]
    pub output_format: Option<String>,
    /// Acceleration level: none, regular, or high (default: none)
    #[serde(default)]
    pub acceleration: Option<String>,
    /// Wait for image data in the response instead of CDN URLs (default: false)
    #[serde(default)]
    pub sync_mode: Option<bool>,
}

impl From<GenerateImageToolParams> for GenerateRequest {
    fn from(params: GenerateImageToolParams) -> Self {
        Self {
            prompt: params.prompt,
            size: params
                .image_size
                .unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            num_inference_steps: params.num_inference_steps.unwrap_or(DEFAULT_STEPS),
            guidance_scale: params.guidance_scale.unwrap_or(DEFAULT_GUIDANCE),
            seed: params.seed,
            negative_prompt: params.negative_prompt.unwrap_or_default(),
            num_images: params.num_images.unwrap_or(1),
            enable_safety_checker: params.enable_safety_checker.unwrap_or(true),
            output_format: params
                .output_format
                .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string()),
            acceleration: params
                .acceleration
                .unwrap_or_else(|| DEFAULT_ACCELERATION.to_string()),
            sync_mode: params.sync_mode.unwrap_or(false),
        }
    }
}

/// fal.ai inference backend.
#[derive(Debug, Clone)]
pub struct FalBackend {
    endpoint: String,
}

impl FalBackend {
    pub fn new() -> Self {
        Self {
            endpoint: FAL_ENDPOINT.to_string(),
        }
    }

    /// Point the backend at a different endpoint (tests, proxies).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for FalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceBackend for FalBackend {
    fn name(&self) -> &'static str {
        "fal.ai"
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn validate(&self, request: &GenerateRequest) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !VALID_IMAGE_SIZES.contains(&request.size.as_str()) {
            errors.push(ValidationError::not_in_set(
                "image_size",
                &request.size,
                VALID_IMAGE_SIZES,
            ));
        }

        if request.num_inference_steps < MIN_STEPS || request.num_inference_steps > MAX_STEPS {
            errors.push(ValidationError::out_of_range(
                "num_inference_steps",
                request.num_inference_steps,
                MIN_STEPS,
                MAX_STEPS,
            ));
        }

        if request.guidance_scale < MIN_GUIDANCE || request.guidance_scale > MAX_GUIDANCE {
            errors.push(ValidationError::out_of_range(
                "guidance_scale",
                request.guidance_scale,
                MIN_GUIDANCE,
                MAX_GUIDANCE,
            ));
        }

        if !VALID_OUTPUT_FORMATS.contains(&request.output_format.as_str()) {
            errors.push(ValidationError::not_in_set(
                "output_format",
                &request.output_format,
                VALID_OUTPUT_FORMATS,
            ));
        }

        if !VALID_ACCELERATIONS.contains(&request.acceleration.as_str()) {
            errors.push(ValidationError::not_in_set(
                "acceleration",
                &request.acceleration,
                VALID_ACCELERATIONS,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn build_payload(&self, request: &GenerateRequest) -> Value {
        let api_request = FalRequest {
            prompt: request.prompt.clone(),
            image_size: request.size.clone(),
            num_inference_steps: request.num_inference_steps,
            guidance_scale: request.guidance_scale,
            seed: request.seed,
            negative_prompt: if request.negative_prompt.is_empty() {
                None
            } else {
                Some(request.negative_prompt.clone())
            },
            num_images: request.num_images,
            enable_safety_checker: request.enable_safety_checker,
            output_format: request.output_format.clone(),
            acceleration: request.acceleration.clone(),
            sync_mode: request.sync_mode,
        };
        serde_json::to_value(api_request).unwrap_or(Value::Null)
    }

    async fn invoke(
        &self,
        http: &reqwest::Client,
        api_key: &str,
        payload: &Value,
    ) -> Result<Value, Error> {
        post_json(http, &self.endpoint, &format!("Key {api_key}"), &[], payload).await
    }

    fn parse_result(&self, body: Value) -> Result<GenerationResult, Error> {
        let response: FalResponse = serde_json::from_value(body).map_err(|e| {
            Error::api(
                &self.endpoint,
                ApiErrorKind::Unknown,
                format!("Failed to parse response: {e}"),
            )
        })?;

        if response.images.is_empty() {
            return Err(Error::api(
                &self.endpoint,
                ApiErrorKind::Unknown,
                "No images returned from API",
            ));
        }

        Ok(GenerationResult {
            images: response
                .images
                .into_iter()
                .map(|img| GeneratedImage {
                    url: img.url,
                    width: img.width,
                    height: img.height,
                    content_type: img.content_type,
                })
                .collect(),
            seed: response.seed,
            request_id: response.request_id,
            nsfw_flags: response.has_nsfw_concepts,
        })
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// fal.ai Qwen Image request body.
#[derive(Debug, Serialize)]
pub struct FalRequest {
    pub prompt: String,
    pub image_size: String,
    pub num_inference_steps: i64,
    pub guidance_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub num_images: u32,
    pub enable_safety_checker: bool,
    pub output_format: String,
    pub acceleration: String,
    pub sync_mode: bool,
}

/// fal.ai Qwen Image response body.
#[derive(Debug, Deserialize)]
pub struct FalResponse {
    /// Generated images, in order
    pub images: Vec<FalImage>,
    /// Seed the platform actually used
    #[serde(default)]
    pub seed: Option<i64>,
    /// Platform-assigned request identifier
    #[serde(default)]
    pub request_id: Option<String>,
    /// Per-image NSFW flags, aligned with `images`
    #[serde(default)]
    pub has_nsfw_concepts: Option<Vec<bool>>,
}

/// One image entry in a fal.ai response.
#[derive(Debug, Deserialize)]
pub struct FalImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub content_type: Option<String>,
}
