//! Backend selection.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::blob::BlobStore;
use crate::client::{R2Client, R2Config};
use crate::error::{StorageError, StorageResult};
use crate::local::LocalBlobStore;
use crate::memory::MemoryBlobStore;

/// Which blob store implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    R2,
    #[default]
    Local,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r2" | "s3" => Ok(Self::R2),
            "local" | "fs" => Ok(Self::Local),
            "memory" => Ok(Self::Memory),
            other => Err(StorageError::config_error(format!(
                "Unknown STORAGE_BACKEND: {}",
                other
            ))),
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    pub backend: StorageBackend,
    /// Directory for the local backend
    pub local_dir: PathBuf,
    /// Base URL local uploads are served from
    pub public_base_url: String,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl BlobStoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let defaults = Self::default();
        let backend = match std::env::var("STORAGE_BACKEND") {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => defaults.backend,
        };

        Ok(Self {
            backend,
            local_dir: std::env::var("LOCAL_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_dir),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or(defaults.public_base_url),
        })
    }
}

/// Build the configured blob store.
pub async fn connect(config: &BlobStoreConfig) -> StorageResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::R2 => Arc::new(R2Client::new(R2Config::from_env()?).await?),
        StorageBackend::Local => Arc::new(LocalBlobStore::new(
            &config.local_dir,
            &config.public_base_url,
        )),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
    };

    info!(backend = store.backend(), "Blob store initialized");
    Ok(store)
}
