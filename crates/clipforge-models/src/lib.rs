//! Shared data models for ClipForge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Projects and their processing status
//! - Generated clips and generator output descriptors
//! - Music and voice style vocabularies

pub mod clip;
pub mod project;
pub mod style;

// Re-export common types
pub use clip::{Clip, ClipDescriptor, ClipId};
pub use project::{
    default_title, NewProject, Project, ProjectId, ProjectStatus, ProjectWithClips,
    DEFAULT_TITLE_PREFIX,
};
pub use style::{MusicStyle, StyleParseError, VoiceStyle, NO_STYLE};
