//! Generator trait.

use async_trait::async_trait;

use clipforge_models::ClipDescriptor;

use crate::error::GeneratorResult;
use crate::types::GenerationRequest;

/// Turns a source video and prompt into clip descriptors.
#[async_trait]
pub trait ClipGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>>;

    /// Backend name used in logs and metrics.
    fn name(&self) -> &'static str;
}
