//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the global Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "clipforge_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "clipforge_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "clipforge_http_requests_in_flight";

    // Project lifecycle
    pub const PROJECTS_CREATED_TOTAL: &str = "clipforge_projects_created_total";
    pub const PROJECTS_COMPLETED_TOTAL: &str = "clipforge_projects_completed_total";
    pub const PROJECTS_FAILED_TOTAL: &str = "clipforge_projects_failed_total";
    pub const CLIPS_GENERATED_TOTAL: &str = "clipforge_clips_generated_total";
    pub const GENERATION_DURATION_SECONDS: &str = "clipforge_generation_duration_seconds";

    // Uploads
    pub const UPLOADS_TOTAL: &str = "clipforge_uploads_total";
    pub const UPLOAD_BYTES_TOTAL: &str = "clipforge_upload_bytes_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "clipforge_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a project entering `processing`.
pub fn record_project_created() {
    counter!(names::PROJECTS_CREATED_TOTAL).increment(1);
}

/// Record a project reaching `completed`.
pub fn record_project_completed(clips: usize) {
    counter!(names::PROJECTS_COMPLETED_TOTAL).increment(1);
    counter!(names::CLIPS_GENERATED_TOTAL).increment(clips as u64);
}

/// Record a project marked `failed`, labelled with the stage that failed.
pub fn record_project_failed(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!(names::PROJECTS_FAILED_TOTAL, &labels).increment(1);
}

/// Record generator run time.
pub fn record_generation_duration(generator: &str, duration_secs: f64) {
    let labels = [("generator", generator.to_string())];
    histogram!(names::GENERATION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a stored upload.
pub fn record_upload(backend: &str, bytes: usize) {
    let labels = [("backend", backend.to_string())];
    counter!(names::UPLOADS_TOTAL, &labels).increment(1);
    counter!(names::UPLOAD_BYTES_TOTAL, &labels).increment(bytes as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Label for the request path. Uses the route template so ids don't explode
/// label cardinality.
fn path_label(request: &Request<Body>) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None if request.uri().path().starts_with("/uploads/") => "/uploads/*".to_string(),
        None => "unmatched".to_string(),
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = path_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
