//! Generator error types.

use thiserror::Error;

pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid generator configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GeneratorError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::ServiceUnavailable(_) | GeneratorError::Network(_)
        )
    }
}
