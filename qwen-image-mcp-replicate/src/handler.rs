//! Replicate backend for Qwen Image generation.
//!
//! Targets the `qwen/qwen-image` model through Replicate's predictions API.
//! The call runs synchronously via the `Prefer: wait` header, so the
//! response is a finished prediction rather than a polling handle.

use async_trait::async_trait;
use qwen_image_mcp_common::backend::{post_json, InferenceBackend, ValidationError};
use qwen_image_mcp_common::error::{ApiErrorKind, Error};
use qwen_image_mcp_common::models::{GenerateRequest, GeneratedImage, GenerationResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Qwen Image predictions endpoint on Replicate.
pub const REPLICATE_ENDPOINT: &str =
    "https://api.replicate.com/v1/models/qwen/qwen-image/predictions";

/// Valid aspect ratios for the Replicate Qwen Image model.
pub const VALID_ASPECT_RATIOS: &[&str] = &["1:1", "16:9", "9:16", "4:3", "3:4"];

/// Inference step bounds.
pub const MIN_STEPS: i64 = 1;
pub const MAX_STEPS: i64 = 100;

/// Guidance bounds.
pub const MIN_GUIDANCE: f64 = 0.0;
pub const MAX_GUIDANCE: f64 = 10.0;

/// Defaults applied to absent optional tool parameters.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
pub const DEFAULT_STEPS: i64 = 50;
pub const DEFAULT_GUIDANCE: f64 = 4.0;

/// Tool parameters for `generate_image` (Replicate variant).
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    pub prompt: String,
    /// Aspect ratio: 1:1, 16:9, 9:16, 4:3, or 3:4 (default: 16:9)
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Number of inference steps, 1-100 (default: 50)
    ///
    /// Deserialized wide so an out-of-range value is rejected by validation
    /// with the legal range, not by the deserializer with a type error.
    #[serde(default)]
    pub num_inference_steps: Option<i64>,
    /// Guidance, 0-10 (default: 4)
    #[serde(default)]
    pub guidance: Option<f64>,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<i64>,
    /// What to avoid in the generated image
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

impl From<GenerateImageToolParams> for GenerateRequest {
    fn from(params: GenerateImageToolParams) -> Self {
        Self {
            prompt: params.prompt,
            size: params
                .aspect_ratio
                .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
            num_inference_steps: params.num_inference_steps.unwrap_or(DEFAULT_STEPS),
            guidance_scale: params.guidance.unwrap_or(DEFAULT_GUIDANCE),
            seed: params.seed,
            negative_prompt: params.negative_prompt.unwrap_or_default(),
            // The Replicate surface produces one image per prediction; the
            // remaining fields are fal.ai-only and stay at neutral values.
            num_images: 1,
            enable_safety_checker: true,
            output_format: "png".to_string(),
            acceleration: "none".to_string(),
            sync_mode: false,
        }
    }
}

/// Replicate inference backend.
#[derive(Debug, Clone)]
pub struct ReplicateBackend {
    endpoint: String,
}

impl ReplicateBackend {
    pub fn new() -> Self {
        Self {
            endpoint: REPLICATE_ENDPOINT.to_string(),
        }
    }

    /// Point the backend at a different endpoint (tests, proxies).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Collect output URLs from a prediction `output` field, which Replicate
    /// reports either as one URL string or as an array of them.
    fn extract_output_urls(output: &Value, out: &mut Vec<String>) {
        match output {
            Value::String(url) => {
                let trimmed = url.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Value::Array(rows) => {
                for row in rows {
                    Self::extract_output_urls(row, out);
                }
            }
            _ => {}
        }
    }
}

impl Default for ReplicateBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceBackend for ReplicateBackend {
    fn name(&self) -> &'static str {
        "replicate"
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn validate(&self, request: &GenerateRequest) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !VALID_ASPECT_RATIOS.contains(&request.size.as_str()) {
            errors.push(ValidationError::not_in_set(
                "aspect_ratio",
                &request.size,
                VALID_ASPECT_RATIOS,
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
                "guidance",
                request.guidance_scale,
                MIN_GUIDANCE,
                MAX_GUIDANCE,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn build_payload(&self, request: &GenerateRequest) -> Value {
        let input = ReplicateInput {
            prompt: request.prompt.clone(),
            aspect_ratio: request.size.clone(),
            num_inference_steps: request.num_inference_steps,
            guidance: request.guidance_scale,
            seed: request.seed,
            negative_prompt: if request.negative_prompt.is_empty() {
                None
            } else {
                Some(request.negative_prompt.clone())
            },
        };
        serde_json::to_value(ReplicateRequest { input }).unwrap_or(Value::Null)
    }

    async fn invoke(
        &self,
        http: &reqwest::Client,
        api_key: &str,
        payload: &Value,
    ) -> Result<Value, Error> {
        post_json(
            http,
            &self.endpoint,
            &format!("Bearer {api_key}"),
            &[("Prefer", "wait")],
            payload,
        )
        .await
    }

    fn parse_result(&self, body: Value) -> Result<GenerationResult, Error> {
        let prediction: ReplicatePrediction = serde_json::from_value(body).map_err(|e| {
            Error::api(
                &self.endpoint,
                ApiErrorKind::Unknown,
                format!("Failed to parse response: {e}"),
            )
        })?;

        match prediction.status.as_str() {
            "succeeded" => {}
            "failed" | "canceled" => {
                return Err(Error::api(
                    &self.endpoint,
                    ApiErrorKind::Unknown,
                    format!(
                        "Prediction {}: {}",
                        prediction.status,
                        prediction.error.unwrap_or_else(|| "no error details".to_string())
                    ),
                ));
            }
            other => {
                // With Prefer: wait the prediction should be terminal; seeing
                // an in-flight status means the wait window was exceeded.
                return Err(Error::api(
                    &self.endpoint,
                    ApiErrorKind::Timeout,
                    format!("Prediction still '{other}' after synchronous wait"),
                ));
            }
        }

        let mut urls = Vec::new();
        if let Some(output) = &prediction.output {
            Self::extract_output_urls(output, &mut urls);
        }
        if urls.is_empty() {
            return Err(Error::api(
                &self.endpoint,
                ApiErrorKind::Unknown,
                "No images returned from API",
            ));
        }

        Ok(GenerationResult {
            images: urls
                .into_iter()
                .map(|url| GeneratedImage {
                    url,
                    width: None,
                    height: None,
                    content_type: None,
                })
                .collect(),
            seed: None,
            request_id: prediction.id,
            nsfw_flags: None,
        })
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Replicate predictions request body.
#[derive(Debug, Serialize)]
pub struct ReplicateRequest {
    pub input: ReplicateInput,
}

/// Model input for `qwen/qwen-image`.
#[derive(Debug, Serialize)]
pub struct ReplicateInput {
    pub prompt: String,
    pub aspect_ratio: String,
    pub num_inference_steps: i64,
    pub guidance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

/// Replicate prediction object (the fields this server reads).
#[derive(Debug, Deserialize)]
pub struct ReplicatePrediction {
    /// Platform-assigned prediction identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Prediction lifecycle status
    pub status: String,
    /// Output URL(s) on success
    #[serde(default)]
    pub output: Option<Value>,
    /// Error details on failure
    #[serde(default)]
    pub error: Option<String>,
}
