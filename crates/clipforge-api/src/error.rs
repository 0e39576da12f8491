//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use clipforge_firestore::StoreError;
use clipforge_generator::GeneratorError;
use clipforge_storage::StorageError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingField,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Store failure during processing. `message` is what the client sees.
    #[error("{message}: {source}")]
    Persistence {
        message: &'static str,
        source: StoreError,
    },

    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Processing failed: {0}")]
    Generation(#[from] GeneratorError),

    #[error("Status check failed: {0}")]
    StatusCheck(#[source] StoreError),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn persistence(message: &'static str, source: StoreError) -> Self {
        Self::Persistence { message, source }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Persistence { .. }
            | ApiError::Storage(_)
            | ApiError::Generation(_)
            | ApiError::StatusCheck(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Causes of server errors stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::MissingField => "Missing required fields".to_string(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Persistence { message, .. } => (*message).to_string(),
            ApiError::Storage(_) => "Upload failed".to_string(),
            ApiError::Generation(_) => "Processing failed".to_string(),
            ApiError::StatusCheck(_) => "Status check failed".to_string(),
            ApiError::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}
