//! Project persistence abstraction.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use clipforge_models::{
    Clip, ClipDescriptor, NewProject, Project, ProjectId, ProjectStatus, ProjectWithClips,
};

use crate::client::FirestoreClient;
use crate::error::FirestoreError;
use crate::memory::MemoryProjectStore;
use crate::repos::FirestoreProjectStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`ProjectStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Firestore(#[from] FirestoreError),
}

impl StoreError {
    pub fn project_not_found(id: &ProjectId) -> Self {
        Self::ProjectNotFound(id.to_string())
    }
}

/// Persistence for projects and their clips.
///
/// Projects are created once in `processing` and updated once to a
/// terminal status. Clips are written once, in bulk, and never modified.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Create a project in `processing` status.
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project>;

    /// Persist all clips for a project in one atomic write.
    async fn insert_clips(
        &self,
        project_id: &ProjectId,
        clips: Vec<ClipDescriptor>,
    ) -> StoreResult<Vec<Clip>>;

    /// Move a project to a new status. `error_message` is kept only for `failed`.
    async fn update_project_status(
        &self,
        project_id: &ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    ) -> StoreResult<()>;

    /// Load a project with its clips, in generation order.
    async fn get_project_with_clips(
        &self,
        project_id: &ProjectId,
    ) -> StoreResult<Option<ProjectWithClips>>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name used in logs and readiness output.
    fn backend(&self) -> &'static str;
}

/// Which project store implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Firestore,
    #[default]
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(StoreError::Config(format!(
                "Unknown STORE_BACKEND: {}",
                other
            ))),
        }
    }
}

impl StoreBackend {
    /// Read `STORE_BACKEND`, defaulting to the in-memory store.
    pub fn from_env() -> StoreResult<Self> {
        match std::env::var("STORE_BACKEND") {
            Ok(v) if !v.is_empty() => v.parse(),
            _ => Ok(Self::default()),
        }
    }
}

/// Build the configured project store.
pub async fn connect(backend: StoreBackend) -> StoreResult<Arc<dyn ProjectStore>> {
    let store: Arc<dyn ProjectStore> = match backend {
        StoreBackend::Firestore => {
            Arc::new(FirestoreProjectStore::new(FirestoreClient::from_env().await?))
        }
        StoreBackend::Memory => Arc::new(MemoryProjectStore::new()),
    };

    info!(backend = store.backend(), "Project store initialized");
    Ok(store)
}
