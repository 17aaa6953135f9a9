//! Generation dispatcher: drives one validated request through a backend.

use crate::backend::{validate_common, InferenceBackend};
use crate::config::Config;
use crate::error::{ApiErrorKind, Error};
use crate::models::{GenerateRequest, GenerationResult};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// A successful generation plus the wall-clock time it took.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Parsed platform result.
    pub result: GenerationResult,
    /// Elapsed time of validate + invoke + parse.
    pub elapsed: Duration,
}

/// Drives the validate → build → invoke → parse sequence for one backend.
pub struct Dispatcher<'a> {
    backend: &'a dyn InferenceBackend,
    http: &'a reqwest::Client,
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        backend: &'a dyn InferenceBackend,
        http: &'a reqwest::Client,
        config: &'a Config,
    ) -> Self {
        Self {
            backend,
            http,
            config,
        }
    }

    /// Run one generation request end to end.
    ///
    /// Validation failures surface before any network call. When the config
    /// carries a timeout, the platform call races against it and expiry is a
    /// distinct, timeout-classified failure with no partial results. No
    /// retries: a single consolidated failure propagates upward.
    #[instrument(level = "info", name = "dispatch_generate", skip_all, fields(backend = self.backend.name()))]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerationOutcome, Error> {
        let mut errors = validate_common(request);
        if let Err(backend_errors) = self.backend.validate(request) {
            errors.extend(backend_errors);
        }
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(Error::validation(messages.join("; ")));
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential("the platform API key variable"))?;

        let payload = self.backend.build_payload(request);
        debug!(endpoint = %self.backend.endpoint(), "Dispatching generation request");

        let started = Instant::now();
        let body = match self.config.request_timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.backend.invoke(self.http, api_key, &payload))
                    .await
                {
                    Ok(result) => result?,
                    Err(_) => {
                        return Err(Error::api(
                            self.backend.endpoint(),
                            ApiErrorKind::Timeout,
                            format!("No response within {} ms", timeout.as_millis()),
                        ));
                    }
                }
            }
            None => self.backend.invoke(self.http, api_key, &payload).await?,
        };

        let result = self.backend.parse_result(body)?;
        let elapsed = started.elapsed();

        info!(
            backend = self.backend.name(),
            images = result.images.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Generation complete"
        );

        Ok(GenerationOutcome { result, elapsed })
    }
}
