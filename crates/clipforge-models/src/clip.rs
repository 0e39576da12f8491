//! Clip models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::project::ProjectId;

/// Unique identifier for a generated clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    /// Generate a new random clip ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clip produced by a generator, before it is attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClipDescriptor {
    pub title: String,
    /// Duration in seconds
    pub duration: u32,
    pub thumbnail_url: String,
    pub video_url: String,
}

impl ClipDescriptor {
    pub fn new(
        title: impl Into<String>,
        duration: u32,
        thumbnail_url: impl Into<String>,
        video_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            duration,
            thumbnail_url: thumbnail_url.into(),
            video_url: video_url.into(),
        }
    }
}

/// A persisted clip. Clips belong to exactly one project and are never
/// updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    pub id: ClipId,

    /// Owning project
    pub project_id: ProjectId,

    pub title: String,

    /// Duration in seconds
    pub duration: u32,

    pub thumbnail_url: String,

    /// Playback URL
    pub video_url: String,

    pub created_at: DateTime<Utc>,
}

impl Clip {
    /// Attach a generator descriptor to its owning project.
    pub fn from_descriptor(project_id: &ProjectId, descriptor: ClipDescriptor) -> Self {
        Self {
            id: ClipId::new(),
            project_id: project_id.clone(),
            title: descriptor.title,
            duration: descriptor.duration,
            thumbnail_url: descriptor.thumbnail_url,
            video_url: descriptor.video_url,
            created_at: Utc::now(),
        }
    }
}
