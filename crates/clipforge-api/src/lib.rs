//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload into the configured blob store
//! - Project processing (create project, generate clips, persist, complete)
//! - Status polling by project id and by job id
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::ProcessingService;
pub use state::AppState;
