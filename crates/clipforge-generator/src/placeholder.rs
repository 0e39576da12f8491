//! Placeholder generator.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use clipforge_models::ClipDescriptor;

use crate::error::GeneratorResult;
use crate::generator::ClipGenerator;
use crate::types::GenerationRequest;

pub const DEFAULT_PLACEHOLDER_DELAY: Duration = Duration::from_millis(2000);

/// The fixed clips returned for every request.
pub fn placeholder_clips() -> Vec<ClipDescriptor> {
    vec![
        ClipDescriptor::new(
            "Build Flappy Bird using Scratch AI",
            30,
            "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/image-ohT2Hd7WREEkQ3FKEuJjhBYDoQEBto.png",
            "/api/mock-video/1",
        ),
        ClipDescriptor::new(
            "Coding Tips & Tricks",
            45,
            "/coding-tips-video-thumbnail.jpg",
            "/api/mock-video/2",
        ),
        ClipDescriptor::new(
            "Behind the Scenes",
            60,
            "/behind-the-scenes-coding-video.jpg",
            "/api/mock-video/3",
        ),
    ]
}

/// Stand-in for real processing: sleeps, then returns [`placeholder_clips`]
/// regardless of input.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    delay: Duration,
}

impl PlaceholderGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_DELAY)
    }
}

#[async_trait]
impl ClipGenerator for PlaceholderGenerator {
    async fn generate(&self, request: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
        debug!(
            video_url = %request.video_url,
            delay_ms = self.delay.as_millis() as u64,
            "Running placeholder generation"
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(placeholder_clips())
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}
