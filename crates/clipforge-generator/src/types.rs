//! Generator request/response types.

use serde::{Deserialize, Serialize};

use clipforge_models::{ClipDescriptor, MusicStyle, VoiceStyle};

/// Input to a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub video_url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_style: Option<MusicStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_style: Option<VoiceStyle>,
}

/// Body returned by the remote generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub clips: Vec<ClipDescriptor>,
}
