//! Shared fixtures for API integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use clipforge_api::{create_router, ApiConfig, AppState};
use clipforge_firestore::{MemoryProjectStore, ProjectStore, StoreError, StoreResult};
use clipforge_generator::{
    ClipGenerator, GenerationRequest, GeneratorError, GeneratorResult, PlaceholderGenerator,
};
use clipforge_models::{
    Clip, ClipDescriptor, NewProject, Project, ProjectId, ProjectStatus, ProjectWithClips,
};
use clipforge_storage::{BlobStore, MemoryBlobStore, StorageError, StorageResult};

pub const BOUNDARY: &str = "clipforge-test-boundary";

/// Backends behind a test router, kept so tests can inspect them.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<FaultyStore>,
    pub blobs: MemoryBlobStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(FaultyStore::default(), instant_generator(), ApiConfig::default())
    }

    pub fn with_store(store: FaultyStore) -> Self {
        Self::build(store, instant_generator(), ApiConfig::default())
    }

    pub fn with_generator(generator: Arc<dyn ClipGenerator>) -> Self {
        Self::build(FaultyStore::default(), generator, ApiConfig::default())
    }

    pub fn with_config(config: ApiConfig) -> Self {
        Self::build(FaultyStore::default(), instant_generator(), config)
    }

    fn build(store: FaultyStore, generator: Arc<dyn ClipGenerator>, config: ApiConfig) -> Self {
        let store = Arc::new(store);
        let blobs = MemoryBlobStore::new();
        let state = AppState::with_backends(
            config,
            store.clone(),
            Arc::new(blobs.clone()),
            generator,
        );

        Self {
            router: create_router(state, None),
            store,
            blobs,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn instant_generator() -> Arc<dyn ClipGenerator> {
    Arc::new(PlaceholderGenerator::new(Duration::ZERO))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// One multipart part: `(name, filename, content_type, data)`.
pub type Part<'a> = (&'a str, Option<&'a str>, Option<&'a str>, &'a [u8]);

pub fn post_multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", name);
        if let Some(filename) = filename {
            disposition.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn process_body() -> Value {
    serde_json::json!({
        "videoUrl": "https://cdn.example.com/uploads/abc/talk.mp4",
        "prompt": "Find the funniest moments",
        "musicStyle": "upbeat",
        "voiceStyle": "narrator",
    })
}

// ============================================================================
// Fault-injecting backends
// ============================================================================

/// Memory store that can fail selected operations and remembers created ids.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryProjectStore,
    pub created: Mutex<Vec<ProjectId>>,
    pub fail_inserts: bool,
    pub fail_clips: bool,
    pub fail_reads: bool,
    pub fail_ping: bool,
}

impl FaultyStore {
    pub fn created_ids(&self) -> Vec<ProjectId> {
        self.created.lock().unwrap().clone()
    }

    fn fault(what: &str) -> StoreError {
        StoreError::Config(format!("injected {} failure", what))
    }
}

#[async_trait]
impl ProjectStore for FaultyStore {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        if self.fail_inserts {
            return Err(Self::fault("insert"));
        }
        let project = self.inner.insert_project(project).await?;
        self.created.lock().unwrap().push(project.id.clone());
        Ok(project)
    }

    async fn insert_clips(
        &self,
        project_id: &ProjectId,
        clips: Vec<ClipDescriptor>,
    ) -> StoreResult<Vec<Clip>> {
        if self.fail_clips {
            return Err(Self::fault("clip"));
        }
        self.inner.insert_clips(project_id, clips).await
    }

    async fn update_project_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        self.inner.update_project_status(id, status, error_message).await
    }

    async fn get_project_with_clips(&self, id: &ProjectId) -> StoreResult<Option<ProjectWithClips>> {
        if self.fail_reads {
            return Err(Self::fault("read"));
        }
        self.inner.get_project_with_clips(id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.fail_ping {
            return Err(Self::fault("ping"));
        }
        self.inner.ping().await
    }

    fn backend(&self) -> &'static str {
        "faulty-memory"
    }
}

/// Blob store that is always down.
pub struct OfflineBlobStore;

#[async_trait]
impl BlobStore for OfflineBlobStore {
    async fn store(&self, _: Vec<u8>, _: &str, _: &str) -> StorageResult<String> {
        Err(StorageError::upload_failed("bucket offline"))
    }

    async fn ping(&self) -> StorageResult<()> {
        Err(StorageError::unavailable("bucket offline"))
    }

    fn backend(&self) -> &'static str {
        "offline"
    }
}

pub struct FailingGenerator;

#[async_trait]
impl ClipGenerator for FailingGenerator {
    async fn generate(&self, _: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
        Err(GeneratorError::ServiceUnavailable("GPU pool drained".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct PanickingGenerator;

#[async_trait]
impl ClipGenerator for PanickingGenerator {
    async fn generate(&self, _: &GenerationRequest) -> GeneratorResult<Vec<ClipDescriptor>> {
        panic!("generator exploded")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
