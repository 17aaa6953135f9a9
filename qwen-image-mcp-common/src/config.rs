//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum number of in-flight tool calls.
///
/// Declared as a tuning value but not enforced anywhere in the call path;
/// kept so deployments can state their intent before admission control lands.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 5;

/// Default request timeout in milliseconds (fal.ai variant only).
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 300_000;

/// Default directory for downloaded images, relative to the working directory.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Application configuration loaded from environment variables.
///
/// Constructed once at startup and passed by reference into every component;
/// no ambient environment lookups happen after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API credential. `None` leaves the server running degraded:
    /// every tool call returns an error response explaining what to set.
    pub api_key: Option<String>,
    /// Environment-mode tag (development, production, ...).
    pub environment: String,
    /// Declared cap on concurrent tool calls. Currently unenforced.
    pub max_concurrent_requests: usize,
    /// Timeout raced against the platform call. `None` disables the race.
    pub request_timeout: Option<Duration>,
    /// Directory downloaded images are written to.
    pub images_dir: PathBuf,
    /// HTTP server port for the http/sse transports.
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// `credential_vars` lists the environment variables checked for the
    /// platform credential, in order (e.g. `FAL_KEY` then `FAL_API_KEY`).
    /// A missing credential is not an error here; live calls report it.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a numeric variable is set but
    /// does not parse.
    pub fn from_env(credential_vars: &[&str]) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = credential_vars.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        });

        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let max_concurrent_requests = parse_env_var(
            "MAX_CONCURRENT_REQUESTS",
            DEFAULT_MAX_CONCURRENT_REQUESTS,
        )?;

        let timeout_ms: u64 = parse_env_var("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let images_dir = std::env::var("IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_IMAGES_DIR));

        let port = parse_env_var("PORT", 8080)?;

        Ok(Self {
            api_key,
            environment,
            max_concurrent_requests,
            request_timeout: Some(Duration::from_millis(timeout_ms)),
            images_dir,
            port,
        })
    }

    /// Disable the platform-call timeout race (Replicate variant).
    pub fn without_timeout(mut self) -> Self {
        self.request_timeout = None;
        self
    }

    /// Whether a live platform call can be attempted.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            environment: "development".to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout: Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            port: 8080,
        }
    }
}

fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_value(name, format!("cannot parse {raw:?}"))),
        Err(_) => Ok(default),
    }
}
