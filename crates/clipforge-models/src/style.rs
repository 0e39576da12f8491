//! Music and voice style vocabularies.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Selection value meaning "no style".
pub const NO_STYLE: &str = "none";

/// Background music styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MusicStyle {
    /// Upbeat & energetic
    Upbeat,
    /// Chill & relaxed
    Chill,
    /// Dramatic & cinematic
    Dramatic,
    /// Trending short-form sounds
    Trending,
}

impl MusicStyle {
    pub const ALL: &'static [MusicStyle] = &[
        MusicStyle::Upbeat,
        MusicStyle::Chill,
        MusicStyle::Dramatic,
        MusicStyle::Trending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicStyle::Upbeat => "upbeat",
            MusicStyle::Chill => "chill",
            MusicStyle::Dramatic => "dramatic",
            MusicStyle::Trending => "trending",
        }
    }

    /// Parse a client selection. Empty input and `none` mean no music.
    pub fn parse_selection(s: &str) -> Result<Option<Self>, StyleParseError> {
        parse_selection(s)
    }
}

impl fmt::Display for MusicStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MusicStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upbeat" => Ok(MusicStyle::Upbeat),
            "chill" => Ok(MusicStyle::Chill),
            "dramatic" => Ok(MusicStyle::Dramatic),
            "trending" => Ok(MusicStyle::Trending),
            _ => Err(StyleParseError::music(s)),
        }
    }
}

/// Voice-over styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceStyle {
    /// Professional narrator
    Narrator,
    /// Casual & friendly
    Casual,
    /// High energy
    Energetic,
    /// AI generated script
    AiGenerated,
}

impl VoiceStyle {
    pub const ALL: &'static [VoiceStyle] = &[
        VoiceStyle::Narrator,
        VoiceStyle::Casual,
        VoiceStyle::Energetic,
        VoiceStyle::AiGenerated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::Narrator => "narrator",
            VoiceStyle::Casual => "casual",
            VoiceStyle::Energetic => "energetic",
            VoiceStyle::AiGenerated => "ai-generated",
        }
    }

    /// Parse a client selection. Empty input and `none` mean no voice-over.
    pub fn parse_selection(s: &str) -> Result<Option<Self>, StyleParseError> {
        parse_selection(s)
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoiceStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "narrator" => Ok(VoiceStyle::Narrator),
            "casual" => Ok(VoiceStyle::Casual),
            "energetic" => Ok(VoiceStyle::Energetic),
            "ai-generated" | "ai_generated" => Ok(VoiceStyle::AiGenerated),
            _ => Err(StyleParseError::voice(s)),
        }
    }
}

fn parse_selection<T: FromStr<Err = StyleParseError>>(
    s: &str,
) -> Result<Option<T>, StyleParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_STYLE) {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleParseError {
    #[error("Unknown music style: {0}")]
    Music(String),

    #[error("Unknown voice style: {0}")]
    Voice(String),
}

impl StyleParseError {
    fn music(s: &str) -> Self {
        Self::Music(s.to_string())
    }

    fn voice(s: &str) -> Self {
        Self::Voice(s.to_string())
    }
}
