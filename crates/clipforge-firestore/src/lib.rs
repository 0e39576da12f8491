//! Firestore REST API client and project persistence.
//!
//! This crate provides:
//! - The [`ProjectStore`] abstraction over projects and their clips
//! - A Firestore-backed store (`projects/{id}` and `projects/{id}/clips/{clipId}`)
//! - An in-memory store for development and tests
//! - Service account authentication via gcp_auth, or the local emulator
//! - Atomic commits and retry logic

pub mod client;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod repos;
pub mod retry;
pub mod store;
pub mod token_cache;
pub mod types;


pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use memory::MemoryProjectStore;
pub use repos::{ClipRepository, FirestoreProjectStore, ProjectRepository};
pub use retry::RetryConfig;
pub use store::{connect, ProjectStore, StoreBackend, StoreError, StoreResult};
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
