//! Clip generation backends.
//!
//! The process handler depends only on [`ClipGenerator`]. Two backends exist:
//! a placeholder that waits a fixed delay and returns three canned clips, and
//! an HTTP client for a remote generation service.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod placeholder;
pub mod types;

pub use client::{HttpClipGenerator, HttpGeneratorConfig};
pub use config::{build, GeneratorBackend, GeneratorConfig};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::ClipGenerator;
pub use placeholder::{placeholder_clips, PlaceholderGenerator, DEFAULT_PLACEHOLDER_DELAY};
pub use types::{GenerateResponse, GenerationRequest};
