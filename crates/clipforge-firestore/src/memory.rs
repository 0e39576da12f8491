//! In-memory project store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use clipforge_models::{
    Clip, ClipDescriptor, NewProject, Project, ProjectId, ProjectStatus, ProjectWithClips,
};

use crate::store::{ProjectStore, StoreError, StoreResult};

/// Project store backed by a process-local map. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectStore {
    projects: Arc<RwLock<HashMap<ProjectId, ProjectWithClips>>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        let project = Project::new(project);
        self.projects.write().await.insert(
            project.id.clone(),
            ProjectWithClips {
                project: project.clone(),
                clips: Vec::new(),
            },
        );
        debug!(project_id = %project.id, "Inserted project");
        Ok(project)
    }

    async fn insert_clips(
        &self,
        project_id: &ProjectId,
        clips: Vec<ClipDescriptor>,
    ) -> StoreResult<Vec<Clip>> {
        let mut projects = self.projects.write().await;
        let entry = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::project_not_found(project_id))?;

        let clips: Vec<Clip> = clips
            .into_iter()
            .map(|d| Clip::from_descriptor(project_id, d))
            .collect();
        entry.clips.extend(clips.iter().cloned());
        Ok(clips)
    }

    async fn update_project_status(
        &self,
        project_id: &ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let entry = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::project_not_found(project_id))?;
        entry.project.set_status(status, error_message);
        Ok(())
    }

    async fn get_project_with_clips(
        &self,
        project_id: &ProjectId,
    ) -> StoreResult<Option<ProjectWithClips>> {
        Ok(self.projects.read().await.get(project_id).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
