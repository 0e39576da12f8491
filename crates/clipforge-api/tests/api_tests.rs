//! API integration tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;

use clipforge_api::{create_router, ApiConfig, AppState};
use clipforge_firestore::{MemoryProjectStore, ProjectStore};
use clipforge_generator::PlaceholderGenerator;
use clipforge_storage::LocalBlobStore;

use common::{
    body_bytes, body_json, get, instant_generator, post_form, post_json, post_multipart,
    process_body, FailingGenerator, FaultyStore, OfflineBlobStore, PanickingGenerator, TestApp,
};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    for path in ["/health", "/healthz"] {
        let response = app.send(get(path)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert!(json["version"].is_string());
    }
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_ready_reports_backends() {
    let app = TestApp::new();

    let response = app.send(get("/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["storage"]["backend"], "memory");
}

#[tokio::test]
async fn test_ready_degraded_when_store_down() {
    let app = TestApp::with_store(FaultyStore {
        fail_ping: true,
        ..Default::default()
    });

    let response = app.send(get("/ready")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::with_backends(
        ApiConfig::default(),
        Arc::new(MemoryProjectStore::new()),
        Arc::new(OfflineBlobStore),
        instant_generator(),
    );
    let app = create_router(state, Some(handle));

    let response = tower::ServiceExt::oneshot(app, get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let app = TestApp::new();
    let response = app.send(get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_video_stores_blob() {
    let app = TestApp::new();
    let data = b"\x00\x00\x00\x18ftypmp42fake-video".as_slice();

    let response = app
        .send(post_multipart(
            "/api/upload-video",
            &[("video", Some("My Talk.mp4"), Some("video/mp4"), data)],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let url = json["url"].as_str().unwrap();
    assert!(url.starts_with("memory://uploads/"));
    assert!(url.ends_with("/My_Talk.mp4"));

    let stored = app.blobs.get(url).await.unwrap();
    assert_eq!(stored.data, data);
    assert_eq!(stored.content_type, "video/mp4");
}

#[tokio::test]
async fn test_upload_large_video_is_stored_intact() {
    let app = TestApp::new();
    let data: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let response = app
        .send(post_multipart(
            "/api/upload-video",
            &[("video", Some("long.mp4"), Some("video/mp4"), data.as_slice())],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let url = body_json(response).await["url"].as_str().unwrap().to_string();
    let stored = app.blobs.get(&url).await.unwrap();
    assert_eq!(stored.data.len(), data.len());
    assert!(stored.data == data);
}

#[tokio::test]
async fn test_upload_without_video_field() {
    let app = TestApp::new();

    let response = app
        .send(post_multipart(
            "/api/upload-video",
            &[("notes", None, None, b"hello".as_slice())],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing video file");
    assert!(app.blobs.is_empty().await);
}

#[tokio::test]
async fn test_upload_rejects_non_video() {
    let app = TestApp::new();

    let response = app
        .send(post_multipart(
            "/api/upload-video",
            &[("video", Some("notes.txt"), Some("text/plain"), b"not a video".as_slice())],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Only video files are allowed");
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let app = TestApp::new();

    let response = app
        .send(post_multipart(
            "/api/upload-video",
            &[("video", Some("empty.mp4"), Some("video/mp4"), b"".as_slice())],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_storage_failure() {
    let state = AppState::with_backends(
        ApiConfig::default(),
        Arc::new(MemoryProjectStore::new()),
        Arc::new(OfflineBlobStore),
        instant_generator(),
    );
    let app = create_router(state, None);

    let response = tower::ServiceExt::oneshot(
        app,
        post_multipart(
            "/api/upload-video",
            &[("video", Some("a.mp4"), Some("video/mp4"), b"data".as_slice())],
        ),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "error": "Upload failed" }));
}

#[tokio::test]
async fn test_uploads_served_from_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let base = "http://localhost:8000";
    let state = AppState::with_backends(
        ApiConfig::default(),
        Arc::new(MemoryProjectStore::new()),
        Arc::new(LocalBlobStore::new(dir.path(), base)),
        instant_generator(),
    )
    .with_uploads_dir(dir.path());
    let app = create_router(state, None);

    let response = tower::ServiceExt::oneshot(
        app.clone(),
        post_multipart(
            "/api/upload-video",
            &[("video", Some("clip.webm"), Some("video/webm"), b"webm-bytes".as_slice())],
        ),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let url = body_json(response).await["url"].as_str().unwrap().to_string();
    let path = url.strip_prefix(base).unwrap();
    assert!(path.starts_with("/uploads/"));

    let response = tower::ServiceExt::oneshot(app, get(path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"webm-bytes");
}

// ============================================================================
// Process
// ============================================================================

#[tokio::test]
async fn test_process_video_returns_three_clips() {
    let app = TestApp::new();

    let response = app.send(post_json("/api/process-video", process_body())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Video processed successfully");

    let project_id = json["projectId"].as_str().unwrap();
    let clips = json["clips"].as_array().unwrap();
    assert_eq!(clips.len(), 3);
    for clip in clips {
        assert_eq!(clip["project_id"], project_id);
    }
    assert_eq!(clips[0]["title"], "Build Flappy Bird using Scratch AI");
    assert_eq!(clips[1]["duration"], 45);
    assert_eq!(clips[2]["video_url"], "/api/mock-video/3");

    let stored = app.store.created_ids();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].as_str(), project_id);
}

#[tokio::test]
async fn test_process_then_check_status() {
    let app = TestApp::new();

    let json = body_json(app.send(post_json("/api/process-video", process_body())).await).await;
    let project_id = json["projectId"].as_str().unwrap().to_string();

    let response = app
        .send(get(&format!("/api/check-status/{}", project_id)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let status = body_json(response).await;
    assert_eq!(status["projectId"], project_id.as_str());
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 100);
    assert_eq!(status["message"], "Video processing completed successfully");
    assert_eq!(status["clips"].as_array().unwrap().len(), 3);

    let response = app
        .send(get(&format!("/api/jobs/{}/status", project_id)))
        .await;
    let job = body_json(response).await;
    assert_eq!(job["jobId"], project_id.as_str());
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"], 100);
}

#[tokio::test]
async fn test_process_accepts_urlencoded_form() {
    let app = TestApp::new();

    let response = app
        .send(post_form(
            "/api/process-video",
            "videoUrl=https%3A%2F%2Fcdn.example.com%2Fv.mp4&prompt=best+bits&musicStyle=none&voiceStyle=&title=Weekly+Recap",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let id = app.store.created_ids()[0].clone();
    let stored = app.store.get_project_with_clips(&id).await.unwrap().unwrap();
    assert_eq!(stored.project.title, "Weekly Recap");
    assert_eq!(stored.project.music_style, None);
    assert_eq!(stored.project.voice_style, None);
}

#[tokio::test]
async fn test_process_accepts_multipart_form() {
    let app = TestApp::new();

    let response = app
        .send(post_multipart(
            "/api/process-video",
            &[
                ("videoUrl", None, None, b"https://cdn.example.com/v.mp4".as_slice()),
                ("prompt", None, None, b"highlight reel".as_slice()),
                ("voiceStyle", None, None, b"ai-generated".as_slice()),
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["clips"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_process_default_title() {
    let app = TestApp::new();

    let response = app
        .send(post_json(
            "/api/process-video",
            json!({ "videoUrl": "https://cdn.example.com/v.mp4", "prompt": "p", "title": "" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let id = app.store.created_ids()[0].clone();
    let stored = app.store.get_project_with_clips(&id).await.unwrap().unwrap();
    assert!(stored.project.title.starts_with("AI Video Project - "));
}

#[tokio::test]
async fn test_process_missing_fields_creates_nothing() {
    let app = TestApp::new();

    for body in [
        json!({ "prompt": "p" }),
        json!({ "videoUrl": "https://cdn.example.com/v.mp4" }),
        json!({ "videoUrl": "", "prompt": "p" }),
    ] {
        let response = app.send(post_json("/api/process-video", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing required fields");
    }

    assert!(app.store.created_ids().is_empty());
    assert_eq!(app.store.inner.project_count().await, 0);
}

#[tokio::test]
async fn test_process_invalid_style() {
    let app = TestApp::new();

    let mut body = process_body();
    body["musicStyle"] = json!("polka");
    let response = app.send(post_json("/api/process-video", body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid music style");
    assert_eq!(app.store.inner.project_count().await, 0);
}

#[tokio::test]
async fn test_identical_submissions_create_distinct_projects() {
    let app = TestApp::new();

    let first = body_json(app.send(post_json("/api/process-video", process_body())).await).await;
    let second = body_json(app.send(post_json("/api/process-video", process_body())).await).await;

    assert_ne!(first["projectId"], second["projectId"]);
    assert_eq!(app.store.inner.project_count().await, 2);
    assert_eq!(second["clips"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_process_project_insert_failure() {
    let app = TestApp::with_store(FaultyStore {
        fail_inserts: true,
        ..Default::default()
    });

    let response = app.send(post_json("/api/process-video", process_body())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to create project");
}

#[tokio::test]
async fn test_clip_failure_marks_project_failed() {
    let app = TestApp::with_store(FaultyStore {
        fail_clips: true,
        ..Default::default()
    });

    let response = app.send(post_json("/api/process-video", process_body())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to save clips");

    let id = app.store.created_ids()[0].clone();
    let response = app.send(get(&format!("/api/check-status/{}", id))).await;
    let status = body_json(response).await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["progress"], 0);
    assert_eq!(status["message"], "Video processing failed");
    assert!(status["clips"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generation_failure_marks_project_failed() {
    let app = TestApp::with_generator(Arc::new(FailingGenerator));

    let response = app.send(post_json("/api/process-video", process_body())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Processing failed");

    let id = app.store.created_ids()[0].clone();
    let job = body_json(app.send(get(&format!("/api/jobs/{}/status", id))).await).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["progress"], 0);
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let app = TestApp::with_generator(Arc::new(PanickingGenerator));

    let response = app.send(post_json("/api/process-video", process_body())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Internal server error");

    let id = app.store.created_ids()[0].clone();
    let status = body_json(app.send(get(&format!("/api/check-status/{}", id))).await).await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["progress"], 0);
}

#[tokio::test]
async fn test_dropped_process_request_still_completes() {
    let generator = Arc::new(PlaceholderGenerator::new(Duration::from_millis(200)));
    let app = TestApp::with_generator(generator);

    // Client hangs up while clips are being generated.
    let dropped = tokio::time::timeout(
        Duration::from_millis(20),
        app.send(post_json("/api/process-video", process_body())),
    )
    .await;
    assert!(dropped.is_err());

    tokio::time::sleep(Duration::from_millis(800)).await;

    let id = app.store.created_ids()[0].clone();
    let status = body_json(app.send(get(&format!("/api/check-status/{}", id))).await).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 100);
    assert_eq!(status["clips"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn test_check_status_unknown_project() {
    let app = TestApp::new();

    let response = app.send(get("/api/check-status/does-not-exist")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project not found");
}

#[tokio::test]
async fn test_job_status_falls_back_to_completed() {
    let app = TestApp::new();

    let response = app.send(get("/api/jobs/legacy-job-7/status")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "jobId": "legacy-job-7",
            "status": "completed",
            "progress": 100,
            "message": "Video processing completed successfully",
        })
    );
}

#[tokio::test]
async fn test_status_store_failure() {
    let app = TestApp::with_store(FaultyStore {
        fail_reads: true,
        ..Default::default()
    });

    let response = app.send(get("/api/check-status/some-project")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Status check failed");

    let response = app.send(get("/api/jobs/some-project/status")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn test_rate_limiting_per_client_ip() {
    let app = TestApp::with_config(ApiConfig {
        rate_limit_rps: 1,
        ..Default::default()
    });

    let request = |ip: &str| {
        axum::http::Request::builder()
            .uri("/api/jobs/any/status")
            .header("X-Forwarded-For", ip)
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let response = app.send(request("192.168.1.100")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(request("192.168.1.100")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "1");

    let response = app.send(request("192.168.1.101")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Health probes are outside the limiter
    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
