//! Error types for the common library.
//!
//! A unified `thiserror` hierarchy shared by both server variants.
//!
//! Platform-call failures carry an [`ApiErrorKind`] assigned at the HTTP
//! client boundary (status codes, transport errors) rather than re-derived
//! from message text downstream, so remediation hints stay stable even when
//! the platform rewords its error bodies.

use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The platform credential is not configured; live calls cannot run.
    #[error("No API credential configured. Set {0} to enable image generation")]
    MissingCredential(&'static str),

    /// Platform API errors with endpoint and classification context.
    #[error("API error for {endpoint} ({kind}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// Structured failure classification
        kind: ApiErrorKind,
        /// Error message from the platform or describing the failure
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with endpoint, kind, and message.
    pub fn api(
        endpoint: impl Into<String>,
        kind: ApiErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// The API failure classification, if this is a platform-call error.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// A targeted remediation hint for the user-facing error block.
    pub fn hint(&self) -> &'static str {
        match self {
            Error::MissingCredential(_) => {
                "Set the platform credential environment variable and restart the server."
            }
            Error::Api { kind, .. } => kind.hint(),
            Error::Validation(_) => {
                "Adjust the listed parameters to their documented sets and ranges."
            }
            Error::Config(_) => "Check the environment variables named in the error.",
            Error::Io(_) => "Check filesystem permissions for the images directory.",
        }
    }
}

/// Classification of a platform-call failure, assigned by the client adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The call exceeded the configured timeout.
    Timeout,
    /// The platform rejected the credential (HTTP 401/403).
    AuthFailure,
    /// The platform throttled the request (HTTP 429).
    RateLimited,
    /// The platform rejected the request payload (HTTP 400/422).
    InvalidInput,
    /// Anything else: transport failures, 5xx, unparseable bodies.
    Unknown,
}

impl ApiErrorKind {
    /// Map an HTTP status code to a failure classification.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ApiErrorKind::AuthFailure,
            429 => ApiErrorKind::RateLimited,
            400 | 422 => ApiErrorKind::InvalidInput,
            _ => ApiErrorKind::Unknown,
        }
    }

    /// Remediation hint shown alongside the failure.
    pub fn hint(&self) -> &'static str {
        match self {
            ApiErrorKind::Timeout => {
                "The request timed out. Try a smaller batch, fewer steps, or raise REQUEST_TIMEOUT_MS."
            }
            ApiErrorKind::AuthFailure => {
                "Authentication failed. Verify the API credential is valid and not expired."
            }
            ApiErrorKind::RateLimited => {
                "Rate limit reached. Wait a moment before retrying, or reduce request frequency."
            }
            ApiErrorKind::InvalidInput => {
                "The platform rejected the request parameters. Check the prompt and parameter values."
            }
            ApiErrorKind::Unknown => {
                "Unexpected platform error. Check the platform status page and try again."
            }
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::AuthFailure => write!(f, "auth failure"),
            ApiErrorKind::RateLimited => write!(f, "rate limited"),
            ApiErrorKind::InvalidInput => write!(f, "invalid input"),
            ApiErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
