//! Process handler: turns an uploaded video and a prompt into clips.

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use clipforge_models::{default_title, Clip, MusicStyle, VoiceStyle};

use crate::error::{ApiError, ApiResult};
use crate::services::Submission;
use crate::state::AppState;

/// Raw process form. Field names follow the web client.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessForm {
    #[validate(required)]
    pub video_url: Option<String>,
    #[validate(required)]
    pub prompt: Option<String>,
    pub music_style: Option<String>,
    pub voice_style: Option<String>,
    pub title: Option<String>,
}

impl ProcessForm {
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "videoUrl" => &mut self.video_url,
            "prompt" => &mut self.prompt,
            "musicStyle" => &mut self.music_style,
            "voiceStyle" => &mut self.voice_style,
            "title" => &mut self.title,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Treat empty and whitespace-only values as absent.
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            video_url: present(self.video_url),
            prompt: present(self.prompt),
            music_style: present(self.music_style),
            voice_style: present(self.voice_style),
            title: present(self.title),
        }
    }

    /// Validate and resolve defaults.
    pub fn into_submission(self) -> ApiResult<Submission> {
        let form = self.normalized();
        form.validate().map_err(|_| ApiError::MissingField)?;

        let music_style = MusicStyle::parse_selection(form.music_style.as_deref().unwrap_or_default())
            .map_err(|_| ApiError::bad_request("Invalid music style"))?;
        let voice_style = VoiceStyle::parse_selection(form.voice_style.as_deref().unwrap_or_default())
            .map_err(|_| ApiError::bad_request("Invalid voice style"))?;

        Ok(Submission {
            title: form.title.unwrap_or_else(|| default_title(Utc::now())),
            video_url: form.video_url.unwrap_or_default(),
            prompt: form.prompt.unwrap_or_default(),
            music_style,
            voice_style,
        })
    }
}

/// Extracts a [`ProcessForm`] from a multipart, urlencoded or JSON body.
pub struct ProcessInput(pub ProcessForm);

#[async_trait]
impl<S> FromRequest<S> for ProcessInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;

            let mut form = ProcessForm::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?
            {
                let name = field.name().unwrap_or_default().to_string();
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.set(&name, value);
            }
            Ok(Self(form))
        } else if content_type.starts_with("application/json") {
            let Json(form) = Json::<ProcessForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(Self(form))
        } else {
            let Form(form) = Form::<ProcessForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(Self(form))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub success: bool,
    pub project_id: String,
    pub clips: Vec<Clip>,
    pub message: String,
}

/// POST /api/process-video
pub async fn process_video(
    State(state): State<AppState>,
    ProcessInput(form): ProcessInput,
) -> ApiResult<Json<ProcessResponse>> {
    let submission = form.into_submission()?;
    let outcome = state.processing().process(submission).await?;

    Ok(Json(ProcessResponse {
        success: true,
        project_id: outcome.project_id.to_string(),
        clips: outcome.clips,
        message: "Video processed successfully".to_string(),
    }))
}
