//! Typed repositories for projects and clips.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use clipforge_models::{
    Clip, ClipDescriptor, ClipId, MusicStyle, NewProject, Project, ProjectId, ProjectStatus,
    ProjectWithClips, VoiceStyle,
};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::store::{ProjectStore, StoreError, StoreResult};
use crate::types::{Document, ToFirestoreValue, Value, Write};

/// Top-level collection holding project documents.
pub const PROJECTS_COLLECTION: &str = "projects";

/// Clip subcollection under each project document.
pub const CLIPS_SUBCOLLECTION: &str = "clips";

/// Stored with each clip so reads return generation order.
const POSITION_FIELD: &str = "position";

/// Repository for project documents.
pub struct ProjectRepository {
    client: FirestoreClient,
}

impl ProjectRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn collection(&self) -> &'static str {
        PROJECTS_COLLECTION
    }

    /// Get a project by ID.
    pub async fn get(&self, project_id: &ProjectId) -> FirestoreResult<Option<Project>> {
        let doc = self
            .client
            .with_retry("get_project", || {
                self.client.get_document(self.collection(), project_id.as_str())
            })
            .await?;

        doc.map(|d| document_to_project(&d, project_id)).transpose()
    }

    /// Create a new project record.
    ///
    /// A conflict on a retried attempt means an earlier attempt landed but its
    /// response was lost; that counts as success once the document is read back.
    pub async fn create(&self, project: &Project) -> FirestoreResult<()> {
        let fields = project_to_fields(project);
        let attempts = AtomicU32::new(0);
        let result = self
            .client
            .with_retry("create_project", || {
                attempts.fetch_add(1, Ordering::Relaxed);
                self.client
                    .create_document(self.collection(), project.id.as_str(), fields.clone())
            })
            .await;

        match result {
            Ok(_) => {}
            Err(FirestoreError::AlreadyExists(msg)) if attempts.load(Ordering::Relaxed) > 1 => {
                if self.get(&project.id).await?.is_none() {
                    return Err(FirestoreError::AlreadyExists(msg));
                }
                warn!(
                    project_id = %project.id,
                    "Project create replayed after a lost response, keeping first write"
                );
            }
            Err(e) => return Err(e),
        }

        info!("Created project record: {}", project.id);
        Ok(())
    }

    /// Update project status. `error_message` is cleared unless failing.
    pub async fn set_status(
        &self,
        project_id: &ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    ) -> FirestoreResult<()> {
        let error_message = match status {
            ProjectStatus::Failed => error_message,
            _ => None,
        };

        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_firestore_value());
        fields.insert("error_message".to_string(), error_message.to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .with_retry("update_project_status", || {
                self.client.update_document(
                    self.collection(),
                    project_id.as_str(),
                    fields.clone(),
                    &["status", "error_message", "updated_at"],
                )
            })
            .await?;
        Ok(())
    }

    /// Cheap read against the collection to confirm connectivity.
    pub async fn ping(&self) -> FirestoreResult<()> {
        self.client
            .list_documents(self.collection(), Some(1), None)
            .await?;
        Ok(())
    }
}

/// Repository for clip documents of one project.
pub struct ClipRepository {
    client: FirestoreClient,
    project_id: ProjectId,
}

impl ClipRepository {
    pub fn new(client: FirestoreClient, project_id: ProjectId) -> Self {
        Self { client, project_id }
    }

    /// Collection path for the project's clips.
    fn collection(&self) -> String {
        format!(
            "{}/{}/{}",
            PROJECTS_COLLECTION,
            self.project_id.as_str(),
            CLIPS_SUBCOLLECTION
        )
    }

    /// Create all clips in a single commit.
    ///
    /// The commit is all-or-nothing, so a conflict on a retried attempt is
    /// accepted when every clip is already stored.
    pub async fn create_all(&self, clips: &[Clip]) -> FirestoreResult<()> {
        let collection = self.collection();
        let writes: Vec<Write> = clips
            .iter()
            .enumerate()
            .map(|(position, clip)| {
                Write::create(Document::named(
                    self.client
                        .full_document_name(&collection, clip.id.as_str()),
                    clip_to_fields(clip, position),
                ))
            })
            .collect();

        let attempts = AtomicU32::new(0);
        let result = self
            .client
            .with_retry("create_clips", || {
                attempts.fetch_add(1, Ordering::Relaxed);
                self.client.commit(writes.clone())
            })
            .await;

        match result {
            Ok(_) => {}
            Err(FirestoreError::AlreadyExists(msg)) if attempts.load(Ordering::Relaxed) > 1 => {
                let stored: HashSet<ClipId> =
                    self.list().await?.into_iter().map(|clip| clip.id).collect();
                if !clips.iter().all(|clip| stored.contains(&clip.id)) {
                    return Err(FirestoreError::AlreadyExists(msg));
                }
                warn!(
                    project_id = %self.project_id,
                    "Clip commit replayed after a lost response, keeping first write"
                );
            }
            Err(e) => return Err(e),
        }

        info!(
            "Created {} clip records for project {}",
            clips.len(),
            self.project_id
        );
        Ok(())
    }

    /// List clips for the project in generation order.
    pub async fn list(&self) -> FirestoreResult<Vec<Clip>> {
        let collection = self.collection();
        let docs = self
            .client
            .with_retry("list_clips", || self.client.list_all_documents(&collection))
            .await?;

        let mut positioned = docs
            .iter()
            .map(|doc| {
                let position = doc.get::<i64>(POSITION_FIELD).unwrap_or(i64::MAX);
                document_to_clip(doc, &self.project_id).map(|clip| (position, clip))
            })
            .collect::<FirestoreResult<Vec<_>>>()?;

        positioned.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then(a.created_at.cmp(&b.created_at)));
        Ok(positioned.into_iter().map(|(_, clip)| clip).collect())
    }
}

// =============================================================================
// Store
// =============================================================================

/// [`ProjectStore`] backed by Firestore.
#[derive(Clone)]
pub struct FirestoreProjectStore {
    client: FirestoreClient,
}

impl FirestoreProjectStore {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn projects(&self) -> ProjectRepository {
        ProjectRepository::new(self.client.clone())
    }

    fn clips(&self, project_id: &ProjectId) -> ClipRepository {
        ClipRepository::new(self.client.clone(), project_id.clone())
    }
}

#[async_trait]
impl ProjectStore for FirestoreProjectStore {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        let project = Project::new(project);
        self.projects().create(&project).await?;
        Ok(project)
    }

    async fn insert_clips(
        &self,
        project_id: &ProjectId,
        clips: Vec<ClipDescriptor>,
    ) -> StoreResult<Vec<Clip>> {
        let clips: Vec<Clip> = clips
            .into_iter()
            .map(|d| Clip::from_descriptor(project_id, d))
            .collect();
        self.clips(project_id).create_all(&clips).await?;
        Ok(clips)
    }

    async fn update_project_status(
        &self,
        project_id: &ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        match self
            .projects()
            .set_status(project_id, status, error_message)
            .await
        {
            Err(FirestoreError::NotFound(_)) => Err(StoreError::project_not_found(project_id)),
            other => Ok(other?),
        }
    }

    async fn get_project_with_clips(
        &self,
        project_id: &ProjectId,
    ) -> StoreResult<Option<ProjectWithClips>> {
        let Some(project) = self.projects().get(project_id).await? else {
            return Ok(None);
        };
        let clips = self.clips(project_id).list().await?;
        Ok(Some(ProjectWithClips { project, clips }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(self.projects().ping().await?)
    }

    fn backend(&self) -> &'static str {
        "firestore"
    }
}

// Helper functions for conversion

fn project_to_fields(project: &Project) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), project.title.to_firestore_value());
    fields.insert("prompt".to_string(), project.prompt.to_firestore_value());
    fields.insert(
        "original_video_url".to_string(),
        project.original_video_url.to_firestore_value(),
    );
    fields.insert(
        "music_style".to_string(),
        project.music_style.map(|s| s.as_str()).to_firestore_value(),
    );
    fields.insert(
        "voice_style".to_string(),
        project.voice_style.map(|s| s.as_str()).to_firestore_value(),
    );
    fields.insert("status".to_string(), project.status.as_str().to_firestore_value());
    fields.insert(
        "error_message".to_string(),
        project.error_message.to_firestore_value(),
    );
    fields.insert("created_at".to_string(), project.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), project.updated_at.to_firestore_value());
    fields
}

fn document_to_project(doc: &Document, project_id: &ProjectId) -> FirestoreResult<Project> {
    let status: String = doc.require("status")?;
    let status = status
        .parse::<ProjectStatus>()
        .map_err(FirestoreError::invalid_response)?;

    let music_style = doc
        .get::<String>("music_style")
        .map(|s| s.parse::<MusicStyle>())
        .transpose()
        .map_err(|e| FirestoreError::invalid_response(e.to_string()))?;
    let voice_style = doc
        .get::<String>("voice_style")
        .map(|s| s.parse::<VoiceStyle>())
        .transpose()
        .map_err(|e| FirestoreError::invalid_response(e.to_string()))?;

    let created_at: DateTime<Utc> = doc.require("created_at")?;

    Ok(Project {
        id: project_id.clone(),
        title: doc.get("title").unwrap_or_default(),
        prompt: doc.get("prompt").unwrap_or_default(),
        original_video_url: doc.get("original_video_url").unwrap_or_default(),
        music_style,
        voice_style,
        status,
        error_message: doc.get("error_message"),
        created_at,
        updated_at: doc.get("updated_at").unwrap_or(created_at),
    })
}

fn clip_to_fields(clip: &Clip, position: usize) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("project_id".to_string(), clip.project_id.as_str().to_firestore_value());
    fields.insert("title".to_string(), clip.title.to_firestore_value());
    fields.insert("duration".to_string(), clip.duration.to_firestore_value());
    fields.insert("thumbnail_url".to_string(), clip.thumbnail_url.to_firestore_value());
    fields.insert("video_url".to_string(), clip.video_url.to_firestore_value());
    fields.insert("created_at".to_string(), clip.created_at.to_firestore_value());
    fields.insert(POSITION_FIELD.to_string(), position.to_firestore_value());
    fields
}

fn document_to_clip(doc: &Document, project_id: &ProjectId) -> FirestoreResult<Clip> {
    let id = doc
        .id()
        .ok_or_else(|| FirestoreError::invalid_response("Clip document has no name"))?;

    Ok(Clip {
        id: ClipId::from_string(id),
        project_id: project_id.clone(),
        title: doc.get("title").unwrap_or_default(),
        duration: doc.get("duration").unwrap_or_default(),
        thumbnail_url: doc.get("thumbnail_url").unwrap_or_default(),
        video_url: doc.get("video_url").unwrap_or_default(),
        created_at: doc.require("created_at")?,
    })
}
