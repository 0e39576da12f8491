//! Backend selection.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::client::{HttpClipGenerator, HttpGeneratorConfig};
use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::ClipGenerator;
use crate::placeholder::{PlaceholderGenerator, DEFAULT_PLACEHOLDER_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorBackend {
    #[default]
    Placeholder,
    Http,
}

impl FromStr for GeneratorBackend {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" | "mock" => Ok(Self::Placeholder),
            "http" | "remote" => Ok(Self::Http),
            other => Err(GeneratorError::Config(format!(
                "Unknown GENERATOR_BACKEND: {}",
                other
            ))),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,
    /// Placeholder delay
    pub delay: Duration,
    pub http: HttpGeneratorConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            delay: DEFAULT_PLACEHOLDER_DELAY,
            http: HttpGeneratorConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> GeneratorResult<Self> {
        let backend = match std::env::var("GENERATOR_BACKEND") {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => GeneratorBackend::default(),
        };

        Ok(Self {
            backend,
            delay: std::env::var("GENERATOR_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PLACEHOLDER_DELAY),
            http: HttpGeneratorConfig::from_env(),
        })
    }
}

/// Build the configured generator.
pub fn build(config: &GeneratorConfig) -> GeneratorResult<Arc<dyn ClipGenerator>> {
    let generator: Arc<dyn ClipGenerator> = match config.backend {
        GeneratorBackend::Placeholder => Arc::new(PlaceholderGenerator::new(config.delay)),
        GeneratorBackend::Http => Arc::new(HttpClipGenerator::new(config.http.clone())?),
    };

    info!(backend = generator.name(), "Clip generator initialized");
    Ok(generator)
}
