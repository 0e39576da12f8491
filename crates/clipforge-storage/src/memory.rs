//! In-memory blob store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::blob::BlobStore;
use crate::error::StorageResult;
use crate::keys::UploadKey;

/// Stored object contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Blob store that keeps uploads in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an object by the URL returned from `store`.
    pub async fn get(&self, url: &str) -> Option<StoredBlob> {
        let key = url.strip_prefix("memory://").unwrap_or(url);
        self.blobs.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        let key = UploadKey::generate(filename).as_key();
        self.blobs.write().await.insert(
            key.clone(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}", key))
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get() {
        let store = MemoryBlobStore::new();
        let url = store.store(vec![1, 2, 3], "a.mp4", "video/mp4").await.unwrap();

        assert!(url.starts_with("memory://uploads/"));
        let blob = store.get(&url).await.unwrap();
        assert_eq!(blob.data, vec![1, 2, 3]);
        assert_eq!(blob.content_type, "video/mp4");
        assert_eq!(store.len().await, 1);
    }
}
