//! The pluggable inference backend trait.
//!
//! Each hosted platform (fal.ai, Replicate) implements [`InferenceBackend`];
//! the shared [`crate::dispatch::Dispatcher`] drives the
//! validate → build → invoke → parse sequence so the two server variants do
//! not duplicate the flow.

use crate::error::{ApiErrorKind, Error};
use crate::models::{GenerateRequest, GenerationResult, MAX_NUM_IMAGES, MIN_NUM_IMAGES};
use async_trait::async_trait;
use serde_json::Value;

/// Validation error details for generation parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure, naming the legal set/range.
    pub message: String,
}

impl ValidationError {
    /// Build an error for a value outside a declared enum set.
    pub fn not_in_set(field: &str, value: &str, valid: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Invalid value '{}'. Valid options: {}", value, valid.join(", ")),
        }
    }

    /// Build an error for a numeric value outside its declared bounds.
    pub fn out_of_range<T: std::fmt::Display>(field: &str, value: T, min: T, max: T) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{field} must be between {min} and {max}, got {value}"),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A hosted text-to-image platform behind the `generate_image` tool.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short platform name for logs and reports.
    fn name(&self) -> &'static str;

    /// The model endpoint this backend posts to.
    fn endpoint(&self) -> String;

    /// Check platform-specific enums and ranges on top of the shared rules.
    ///
    /// Pure: no network, no side effects. Collects every violation rather
    /// than stopping at the first.
    fn validate(&self, request: &GenerateRequest) -> Result<(), Vec<ValidationError>>;

    /// Build the platform-specific request payload.
    fn build_payload(&self, request: &GenerateRequest) -> Value;

    /// Issue the single synchronous platform call.
    async fn invoke(
        &self,
        http: &reqwest::Client,
        api_key: &str,
        payload: &Value,
    ) -> Result<Value, Error>;

    /// Extract the ordered image list and metadata from the response body.
    fn parse_result(&self, body: Value) -> Result<GenerationResult, Error>;
}

/// Shared validation rules every backend applies before its own.
pub fn validate_common(request: &GenerateRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if request.prompt.trim().is_empty() {
        errors.push(ValidationError {
            field: "prompt".to_string(),
            message: "Prompt cannot be empty".to_string(),
        });
    }

    if request.num_images < MIN_NUM_IMAGES || request.num_images > MAX_NUM_IMAGES {
        errors.push(ValidationError::out_of_range(
            "num_images",
            request.num_images,
            MIN_NUM_IMAGES,
            MAX_NUM_IMAGES,
        ));
    }

    errors
}

/// POST a JSON payload and return the parsed body, classifying failures at
/// the client boundary.
///
/// `auth_header` is the full Authorization header value (`Key ...` for
/// fal.ai, `Bearer ...` for Replicate); `extra_headers` carries
/// platform-specific additions such as Replicate's `Prefer: wait`.
pub async fn post_json(
    http: &reqwest::Client,
    endpoint: &str,
    auth_header: &str,
    extra_headers: &[(&str, &str)],
    payload: &Value,
) -> Result<Value, Error> {
    let mut builder = http
        .post(endpoint)
        .header(reqwest::header::AUTHORIZATION, auth_header)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .json(payload);
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }

    let response = builder.send().await.map_err(|e| {
        let kind = if e.is_timeout() {
            ApiErrorKind::Timeout
        } else {
            ApiErrorKind::Unknown
        };
        Error::api(endpoint, kind, format!("Request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::api(
            endpoint,
            ApiErrorKind::from_status(status.as_u16()),
            format!("HTTP {}: {}", status.as_u16(), truncate(&body, 512)),
        ));
    }

    response.json().await.map_err(|e| {
        Error::api(
            endpoint,
            ApiErrorKind::Unknown,
            format!("Failed to parse response: {e}"),
        )
    })
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
