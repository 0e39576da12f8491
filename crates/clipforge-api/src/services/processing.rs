//! Project processing workflow.
//!
//! A process request runs four steps: create the project, generate clips,
//! persist the clips, mark the project completed. Once the project exists,
//! any later failure moves it to `failed` so pollers never see a project
//! stuck in `processing`. That includes a panic in a backend. The run does
//! not depend on the caller staying connected.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use clipforge_firestore::ProjectStore;
use clipforge_generator::{ClipGenerator, GenerationRequest};
use clipforge_models::{Clip, MusicStyle, NewProject, ProjectId, ProjectStatus, VoiceStyle};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// A validated process submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub title: String,
    pub video_url: String,
    pub prompt: String,
    pub music_style: Option<MusicStyle>,
    pub voice_style: Option<VoiceStyle>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub project_id: ProjectId,
    pub clips: Vec<Clip>,
}

/// Runs the create → generate → persist → complete sequence.
#[derive(Clone)]
pub struct ProcessingService {
    store: Arc<dyn ProjectStore>,
    generator: Arc<dyn ClipGenerator>,
}

impl ProcessingService {
    pub fn new(store: Arc<dyn ProjectStore>, generator: Arc<dyn ClipGenerator>) -> Self {
        Self { store, generator }
    }

    /// Runs the whole sequence on its own task so a dropped request cannot
    /// abandon a project between steps.
    pub async fn process(&self, submission: Submission) -> ApiResult<ProcessOutcome> {
        let service = self.clone();
        tokio::spawn(async move { service.run(submission).await })
            .await
            .map_err(|e| ApiError::internal(format!("processing task aborted: {}", e)))?
    }

    async fn run(&self, submission: Submission) -> ApiResult<ProcessOutcome> {
        let request = GenerationRequest {
            video_url: submission.video_url.clone(),
            prompt: submission.prompt.clone(),
            music_style: submission.music_style,
            voice_style: submission.voice_style,
        };

        let project = self
            .store
            .insert_project(NewProject {
                title: submission.title,
                prompt: submission.prompt,
                original_video_url: submission.video_url,
                music_style: submission.music_style,
                voice_style: submission.voice_style,
            })
            .await
            .map_err(|e| ApiError::persistence("Failed to create project", e))?;

        let project_id = project.id;
        metrics::record_project_created();
        info!(project_id = %project_id, generator = self.generator.name(), "Project created");

        // A panic in a backend surfaces as a JoinError, leaving the project id
        // in hand for compensation.
        let service = self.clone();
        let id = project_id.clone();
        match tokio::spawn(async move { service.generate_and_persist(id, request).await }).await {
            Ok(result) => result,
            Err(e) => {
                self.mark_failed(&project_id, "panic", &e.to_string()).await;
                Err(ApiError::internal(format!(
                    "processing of project {} aborted: {}",
                    project_id, e
                )))
            }
        }
    }

    async fn generate_and_persist(
        &self,
        project_id: ProjectId,
        request: GenerationRequest,
    ) -> ApiResult<ProcessOutcome> {
        let start = Instant::now();
        let descriptors = match self.generator.generate(&request).await {
            Ok(descriptors) => descriptors,
            Err(e) => {
                self.mark_failed(&project_id, "generate", &e.to_string()).await;
                return Err(ApiError::Generation(e));
            }
        };
        metrics::record_generation_duration(self.generator.name(), start.elapsed().as_secs_f64());

        let clips = match self.store.insert_clips(&project_id, descriptors).await {
            Ok(clips) => clips,
            Err(e) => {
                self.mark_failed(&project_id, "save_clips", &e.to_string()).await;
                return Err(ApiError::persistence("Failed to save clips", e));
            }
        };

        if let Err(e) = self
            .store
            .update_project_status(&project_id, ProjectStatus::Completed, None)
            .await
        {
            self.mark_failed(&project_id, "complete", &e.to_string()).await;
            return Err(ApiError::persistence("Processing failed", e));
        }

        metrics::record_project_completed(clips.len());
        info!(project_id = %project_id, clips = clips.len(), "Project completed");

        Ok(ProcessOutcome { project_id, clips })
    }

    /// Best-effort compensation. A failure here is logged and otherwise ignored.
    async fn mark_failed(&self, project_id: &ProjectId, stage: &str, reason: &str) {
        warn!(project_id = %project_id, stage, reason, "Processing failed, marking project failed");
        metrics::record_project_failed(stage);

        if let Err(e) = self
            .store
            .update_project_status(project_id, ProjectStatus::Failed, Some(reason.to_string()))
            .await
        {
            error!(project_id = %project_id, error = %e, "Failed to mark project as failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use clipforge_firestore::{MemoryProjectStore, StoreError, StoreResult};
    use clipforge_generator::{GeneratorError, GeneratorResult, PlaceholderGenerator};
    use clipforge_models::{ClipDescriptor, Project, ProjectWithClips};

    fn submission() -> Submission {
        Submission {
            title: "Demo".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            prompt: "find the best moments".to_string(),
            music_style: Some(MusicStyle::Chill),
            voice_style: None,
        }
    }

    fn instant_generator() -> Arc<dyn ClipGenerator> {
        Arc::new(PlaceholderGenerator::new(Duration::ZERO))
    }

    struct BrokenGenerator;

    #[async_trait]
    impl ClipGenerator for BrokenGenerator {
        async fn generate(&self, _: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
            Err(GeneratorError::ServiceUnavailable("offline".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct ExplodingGenerator;

    #[async_trait]
    impl ClipGenerator for ExplodingGenerator {
        async fn generate(&self, _: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
            panic!("model crashed")
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    /// Delegates to a memory store but can fail selected operations.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryProjectStore,
        created: std::sync::Mutex<Vec<ProjectId>>,
        fail_clips: bool,
        fail_completion: bool,
    }

    impl FlakyStore {
        async fn only_project(&self) -> ProjectWithClips {
            let id = self.created.lock().unwrap()[0].clone();
            self.inner.get_project_with_clips(&id).await.unwrap().unwrap()
        }
    }

    #[async_trait]
    impl ProjectStore for FlakyStore {
        async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
            let project = self.inner.insert_project(project).await?;
            self.created.lock().unwrap().push(project.id.clone());
            Ok(project)
        }

        async fn insert_clips(
            &self,
            project_id: &ProjectId,
            clips: Vec<ClipDescriptor>,
        ) -> StoreResult<Vec<Clip>> {
            if self.fail_clips {
                return Err(StoreError::Config("clips unavailable".to_string()));
            }
            self.inner.insert_clips(project_id, clips).await
        }

        async fn update_project_status(
            &self,
            id: &ProjectId,
            status: ProjectStatus,
            error_message: Option<String>,
        ) -> StoreResult<()> {
            if self.fail_completion && status == ProjectStatus::Completed {
                return Err(StoreError::Config("write rejected".to_string()));
            }
            self.inner.update_project_status(id, status, error_message).await
        }

        async fn get_project_with_clips(&self, id: &ProjectId) -> StoreResult<Option<ProjectWithClips>> {
            self.inner.get_project_with_clips(id).await
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_process_completes_project() {
        let store = MemoryProjectStore::new();
        let service = ProcessingService::new(Arc::new(store.clone()), instant_generator());

        let outcome = service.process(submission()).await.unwrap();

        assert_eq!(outcome.clips.len(), 3);
        assert!(outcome.clips.iter().all(|c| c.project_id == outcome.project_id));

        let stored = store
            .get_project_with_clips(&outcome.project_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.project.status, ProjectStatus::Completed);
        assert_eq!(stored.project.music_style, Some(MusicStyle::Chill));
        assert_eq!(stored.clips.len(), 3);
    }

    #[tokio::test]
    async fn test_generation_failure_marks_project_failed() {
        let store = Arc::new(FlakyStore::default());
        let service = ProcessingService::new(store.clone(), Arc::new(BrokenGenerator));

        let err = service.process(submission()).await.unwrap_err();
        assert!(matches!(err, ApiError::Generation(_)));
        assert_eq!(err.public_message(), "Processing failed");

        let stored = store.only_project().await;
        assert_eq!(stored.project.status, ProjectStatus::Failed);
        assert!(stored.project.error_message.unwrap().contains("offline"));
        assert!(stored.clips.is_empty());
    }

    #[tokio::test]
    async fn test_clip_failure_marks_project_failed() {
        let store = Arc::new(FlakyStore {
            fail_clips: true,
            ..Default::default()
        });
        let service = ProcessingService::new(store.clone(), instant_generator());

        let err = service.process(submission()).await.unwrap_err();
        assert_eq!(err.public_message(), "Failed to save clips");

        let stored = store.only_project().await;
        assert_eq!(stored.project.status, ProjectStatus::Failed);
        assert_eq!(stored.project.status.progress(), 0);
    }

    #[tokio::test]
    async fn test_completion_failure_is_surfaced() {
        let store = Arc::new(FlakyStore {
            fail_completion: true,
            ..Default::default()
        });
        let service = ProcessingService::new(store.clone(), instant_generator());

        let err = service.process(submission()).await.unwrap_err();
        assert_eq!(err.public_message(), "Processing failed");
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let stored = store.only_project().await;
        assert_eq!(stored.project.status, ProjectStatus::Failed);
        assert_eq!(stored.clips.len(), 3);
    }

    #[tokio::test]
    async fn test_generator_panic_marks_project_failed() {
        let store = Arc::new(FlakyStore::default());
        let service = ProcessingService::new(store.clone(), Arc::new(ExplodingGenerator));

        let err = service.process(submission()).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.public_message(), "Internal server error");

        let stored = store.only_project().await;
        assert_eq!(stored.project.status, ProjectStatus::Failed);
        assert!(stored.project.error_message.unwrap().contains("panic"));
    }

    #[tokio::test]
    async fn test_abandoned_caller_still_completes_project() {
        let store = Arc::new(FlakyStore::default());
        let generator = Arc::new(PlaceholderGenerator::new(Duration::from_millis(100)));
        let service = ProcessingService::new(store.clone(), generator);

        // The caller gives up while generation is still running.
        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), service.process(submission())).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;

        let stored = store.only_project().await;
        assert_eq!(stored.project.status, ProjectStatus::Completed);
        assert_eq!(stored.clips.len(), 3);
    }
}
