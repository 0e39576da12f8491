//! Application state.

use std::path::PathBuf;
use std::sync::Arc;

use clipforge_firestore::{ProjectStore, StoreBackend};
use clipforge_generator::{ClipGenerator, GeneratorConfig};
use clipforge_storage::{BlobStore, BlobStoreConfig, StorageBackend};

use crate::config::ApiConfig;
use crate::services::ProcessingService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn ProjectStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub generator: Arc<dyn ClipGenerator>,
    /// Directory served under `/uploads` when the local blob store is active
    pub uploads_dir: Option<PathBuf>,
}

impl AppState {
    /// Create application state from the environment-selected backends.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = clipforge_firestore::connect(StoreBackend::from_env()?).await?;

        let blob_config = BlobStoreConfig::from_env()?;
        let blobs = clipforge_storage::connect(&blob_config).await?;

        let generator = clipforge_generator::build(&GeneratorConfig::from_env()?)?;

        let uploads_dir =
            (blob_config.backend == StorageBackend::Local).then(|| blob_config.local_dir.clone());

        Ok(Self {
            config,
            store,
            blobs,
            generator,
            uploads_dir,
        })
    }

    /// Create state from already constructed backends.
    pub fn with_backends(
        config: ApiConfig,
        store: Arc<dyn ProjectStore>,
        blobs: Arc<dyn BlobStore>,
        generator: Arc<dyn ClipGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            blobs,
            generator,
            uploads_dir: None,
        }
    }

    /// Serve files from `dir` under `/uploads`.
    pub fn with_uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = Some(dir.into());
        self
    }

    pub fn processing(&self) -> ProcessingService {
        ProcessingService::new(Arc::clone(&self.store), Arc::clone(&self.generator))
    }
}
