//! Blob store abstraction.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Durable storage for uploaded files.
///
/// `store` returns a URL that clients can later submit for processing.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a freshly generated key derived from `filename`.
    async fn store(&self, data: Vec<u8>, filename: &str, content_type: &str)
        -> StorageResult<String>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> StorageResult<()>;

    /// Short backend name used in logs and readiness output.
    fn backend(&self) -> &'static str;
}
