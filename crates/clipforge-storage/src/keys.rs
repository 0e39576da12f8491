//! Object key generation for uploads.

use std::fmt;

use uuid::Uuid;

/// Key prefix shared by every uploaded object.
pub const UPLOAD_PREFIX: &str = "uploads";

const FALLBACK_FILENAME: &str = "video";
const MAX_FILENAME_LEN: usize = 128;

/// Reduce a client-supplied filename to a safe single path segment.
///
/// Directory components are dropped and anything outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Generated location of one uploaded object: `uploads/{id}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadKey {
    pub id: String,
    pub filename: String,
}

impl UploadKey {
    /// Generate a unique key for a client filename.
    pub fn generate(filename: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: sanitize_filename(filename),
        }
    }

    /// Path below the upload prefix (`{id}/{filename}`).
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.id, self.filename)
    }

    /// Full object key.
    pub fn as_key(&self) -> String {
        format!("{}/{}", UPLOAD_PREFIX, self.relative_path())
    }
}

impl fmt::Display for UploadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// Join a base URL and an object key with exactly one slash.
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
