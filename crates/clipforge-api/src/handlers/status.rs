//! Status polling handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use clipforge_models::{Clip, ProjectId, ProjectStatus, ProjectWithClips};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusResponse {
    pub project_id: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub clips: Vec<Clip>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub message: String,
}

impl JobStatusResponse {
    fn for_status(job_id: String, status: ProjectStatus) -> Self {
        Self {
            job_id,
            status,
            progress: status.progress(),
            message: status.message().to_string(),
        }
    }
}

/// GET /api/check-status/:project_id
pub async fn check_project_status(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ProjectStatusResponse>> {
    let ProjectWithClips { project, clips } = load_project(&state, &project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(ProjectStatusResponse {
        project_id: project.id.to_string(),
        status: project.status,
        progress: project.status.progress(),
        clips,
        message: project.status.message().to_string(),
    }))
}

/// GET /api/jobs/:job_id/status
///
/// Job ids are project ids. Ids that match no project keep the historical
/// behaviour of reporting a completed job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let status = match load_project(&state, &job_id).await? {
        Some(found) => found.project.status,
        None => {
            debug!(job_id = %job_id, "No project for job id, reporting completed");
            ProjectStatus::Completed
        }
    };

    Ok(Json(JobStatusResponse::for_status(job_id, status)))
}

async fn load_project(state: &AppState, id: &str) -> ApiResult<Option<ProjectWithClips>> {
    // Ids that can't name a stored document are simply unknown
    if !is_valid_project_id(id) {
        return Ok(None);
    }

    state
        .store
        .get_project_with_clips(&ProjectId::from(id))
        .await
        .map_err(ApiError::StatusCheck)
}

/// Project ids are UUIDs, but any short token of alphanumerics, hyphens and
/// underscores is looked up.
fn is_valid_project_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
