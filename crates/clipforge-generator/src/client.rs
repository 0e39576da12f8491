//! HTTP client for a remote generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use clipforge_models::ClipDescriptor;

use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::ClipGenerator;
use crate::types::{GenerateResponse, GenerationRequest};

/// Configuration for the HTTP generator.
#[derive(Debug, Clone)]
pub struct HttpGeneratorConfig {
    /// Base URL of the generation service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
    /// First retry delay; doubles on each attempt
    pub retry_base_delay: Duration,
}

impl Default for HttpGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(300),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl HttpGeneratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GENERATOR_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GENERATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: std::env::var("GENERATOR_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_base_delay: defaults.retry_base_delay,
        }
    }
}

/// Generator that delegates to `POST {base_url}/generate`.
pub struct HttpClipGenerator {
    http: Client,
    config: HttpGeneratorConfig,
}

impl HttpClipGenerator {
    pub fn new(config: HttpGeneratorConfig) -> GeneratorResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("clipforge-generator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GeneratorError::Network)?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> GeneratorResult<Self> {
        Self::new(HttpGeneratorConfig::from_env())
    }

    async fn request_once(
        &self,
        url: &str,
        request: &GenerationRequest,
    ) -> GeneratorResult<Vec<ClipDescriptor>> {
        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ServiceUnavailable(format!(
                "generator returned {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::RequestFailed(format!(
                "generator returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        Ok(parsed.clips)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> GeneratorResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = GeneratorResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt);
                    warn!(
                        "Generator request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| GeneratorError::RequestFailed("Unknown error".to_string())))
    }
}

#[async_trait]
impl ClipGenerator for HttpClipGenerator {
    async fn generate(&self, request: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
        let url = format!("{}/generate", self.config.base_url.trim_end_matches('/'));
        debug!("Sending generation request to {}", url);

        self.with_retry(|| self.request_once(&url, request)).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
