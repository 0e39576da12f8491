//! Video upload handler.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

struct VideoPart {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// POST /api/upload-video
///
/// Stores the `video` part of a multipart form and returns its public URL.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let part = read_video_part(multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("Missing video file"))?;

    if part.data.is_empty() {
        return Err(ApiError::bad_request("Empty video file"));
    }
    if !part.content_type.to_ascii_lowercase().starts_with("video/") {
        return Err(ApiError::bad_request("Only video files are allowed"));
    }

    let size = part.data.len();
    let url = state
        .blobs
        .store(part.data, &part.filename, &part.content_type)
        .await?;

    metrics::record_upload(state.blobs.backend(), size);
    info!(url = %url, bytes = size, content_type = %part.content_type, "Video uploaded");

    Ok(Json(UploadResponse { url }))
}

/// Read the first `video` field, skipping any others.
async fn read_video_part(mut multipart: Multipart) -> ApiResult<Option<VideoPart>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or(VIDEO_FIELD).to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        // Chunks go straight into the owned buffer handed to the blob store.
        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            data.extend_from_slice(&chunk);
        }

        return Ok(Some(VideoPart {
            filename,
            content_type,
            data,
        }));
    }

    Ok(None)
}
