//! Local filesystem blob store for development.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::blob::BlobStore;
use crate::error::{StorageError, StorageResult};
use crate::keys::{join_url, UploadKey};

/// Writes uploads below `root` and returns URLs under `public_base_url`.
///
/// `root` corresponds to the `uploads/` key prefix, so a file stored at
/// `{root}/{id}/{name}` is addressed as `{public_base_url}/uploads/{id}/{name}`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Directory uploads are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an upload key.
    pub fn path_for(&self, key: &UploadKey) -> PathBuf {
        self.root.join(&key.id).join(&key.filename)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        data: Vec<u8>,
        filename: &str,
        _content_type: &str,
    ) -> StorageResult<String> {
        let key = UploadKey::generate(filename);
        let path = self.path_for(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::upload_failed(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| StorageError::upload_failed(format!("Failed to write file: {}", e)))?;

        info!(path = %path.display(), size = data.len(), "Stored upload on disk");
        Ok(join_url(&self.public_base_url, &key.as_key()))
    }

    async fn ping(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let metadata = tokio::fs::metadata(&self.root).await?;
        if metadata.permissions().readonly() {
            return Err(StorageError::unavailable(format!(
                "{} is read-only",
                self.root.display()
            )));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
