//! Project models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::clip::Clip;
use crate::style::{MusicStyle, VoiceStyle};

/// Prefix of the title given to projects submitted without one.
pub const DEFAULT_TITLE_PREFIX: &str = "AI Video Project";

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Project processing status.
///
/// A project is `Processing` from creation until generation finishes, then
/// moves to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Generation is running
    #[default]
    Processing,
    /// Clips were generated and persisted
    Completed,
    /// Generation or persistence failed after the project was created
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Processing => "processing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Failed => "failed",
        }
    }

    /// Coarse progress percentage reported to polling clients.
    pub fn progress(&self) -> u8 {
        match self {
            ProjectStatus::Completed => 100,
            ProjectStatus::Processing => 50,
            ProjectStatus::Failed => 0,
        }
    }

    /// Human-readable status message reported to polling clients.
    pub fn message(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Video processing completed successfully",
            ProjectStatus::Failed => "Video processing failed",
            ProjectStatus::Processing => "Processing in progress...",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Failed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(ProjectStatus::Processing),
            "completed" => Ok(ProjectStatus::Completed),
            "failed" => Ok(ProjectStatus::Failed),
            other => Err(format!("Unknown project status: {}", other)),
        }
    }
}

/// Build the title used when a submission does not provide one.
pub fn default_title(now: DateTime<Utc>) -> String {
    format!("{} - {}", DEFAULT_TITLE_PREFIX, now.format("%Y-%m-%d"))
}

/// Fields supplied by a client when a project is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewProject {
    pub title: String,
    pub prompt: String,
    pub original_video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_style: Option<MusicStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_style: Option<VoiceStyle>,
}

/// A persisted project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: ProjectId,

    pub title: String,

    /// Prompt steering clip generation
    pub prompt: String,

    /// URL of the uploaded source video
    pub original_video_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_style: Option<MusicStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_style: Option<VoiceStyle>,

    #[serde(default)]
    pub status: ProjectStatus,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project record in `Processing` status.
    pub fn new(fields: NewProject) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            title: fields.title,
            prompt: fields.prompt,
            original_video_url: fields.original_video_url,
            music_style: fields.music_style,
            voice_style: fields.voice_style,
            status: ProjectStatus::Processing,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status transition.
    pub fn set_status(&mut self, status: ProjectStatus, error_message: Option<String>) {
        self.status = status;
        self.error_message = match status {
            ProjectStatus::Failed => error_message,
            _ => None,
        };
        self.updated_at = Utc::now();
    }
}

/// A project together with the clips generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectWithClips {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_project() -> NewProject {
        NewProject {
            title: "My Project".to_string(),
            prompt: "make shorts".to_string(),
            original_video_url: "https://x/vid.mp4".to_string(),
            music_style: Some(MusicStyle::Upbeat),
            voice_style: Some(VoiceStyle::Narrator),
        }
    }

    #[test]
    fn test_project_id_generation() {
        let id1 = ProjectId::new();
        let id2 = ProjectId::new();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn test_new_project_starts_processing() {
        let project = Project::new(new_project());
        assert_eq!(project.status, ProjectStatus::Processing);
        assert_eq!(project.title, "My Project");
        assert!(project.error_message.is_none());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_status_progress_mapping() {
        assert_eq!(ProjectStatus::Completed.progress(), 100);
        assert_eq!(ProjectStatus::Processing.progress(), 50);
        assert_eq!(ProjectStatus::Failed.progress(), 0);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            ProjectStatus::Completed.message(),
            "Video processing completed successfully"
        );
        assert_eq!(ProjectStatus::Processing.message(), "Processing in progress...");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ProjectStatus::Processing,
            ProjectStatus::Completed,
            ProjectStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>(), Ok(status));
        }
        assert!("queued".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_set_status_clears_error_unless_failed() {
        let mut project = Project::new(new_project());
        project.set_status(ProjectStatus::Failed, Some("boom".to_string()));
        assert_eq!(project.error_message.as_deref(), Some("boom"));
        assert!(project.status.is_terminal());

        project.set_status(ProjectStatus::Completed, Some("ignored".to_string()));
        assert!(project.error_message.is_none());
    }

    #[test]
    fn test_default_title_uses_date() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        assert_eq!(default_title(now), "AI Video Project - 2026-10-17");
    }

    #[test]
    fn test_project_with_clips_serializes_flat() {
        let with_clips = ProjectWithClips {
            project: Project::new(new_project()),
            clips: Vec::new(),
        };
        let json = serde_json::to_value(&with_clips).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["music_style"], "upbeat");
        assert!(json["clips"].as_array().unwrap().is_empty());
    }
}
