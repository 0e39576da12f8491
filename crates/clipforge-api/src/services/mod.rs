//! Business services.

pub mod processing;

pub use processing::{ProcessOutcome, ProcessingService, Submission};
