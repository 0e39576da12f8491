//! Blob storage for uploaded source videos.
//!
//! This crate provides:
//! - The [`BlobStore`] abstraction used by the upload handler
//! - A Cloudflare R2 backend (S3 API)
//! - A local filesystem backend for development
//! - An in-memory backend for tests

pub mod blob;
pub mod client;
pub mod config;
pub mod error;
pub mod keys;
pub mod local;
pub mod memory;

pub use blob::BlobStore;
pub use client::{R2Client, R2Config};
pub use config::{connect, BlobStoreConfig, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use keys::{sanitize_filename, UploadKey, UPLOAD_PREFIX};
pub use local::LocalBlobStore;
pub use memory::{MemoryBlobStore, StoredBlob};
