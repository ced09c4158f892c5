use std::path::{Component, Path};

use async_trait::async_trait;
use serde::Serialize;

use super::error::StorageError;

/// What kind of file is being relayed. Decides the stored extension and,
/// for remote stores, how the object is served.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// PDF lessons and papers, stored as raw files.
    Document,
    /// Profile logos and homepage images.
    Image,
}

/// Bytes received from a client, already type- and size-checked.
#[derive(Clone, Debug)]
pub struct MediaUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Locator pair returned by a successful upload. Both halves are persisted
/// together on the owning record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredMedia {
    /// Publicly reachable URL of the object.
    pub url: String,
    /// Handle used to delete the object later.
    pub public_id: String,
}

/// Object store that hosts uploaded files outside the database.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the upload under `folder` and return its locator.
    async fn upload(
        &self,
        upload: MediaUpload,
        folder: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError>;

    /// Delete an object by its public ID.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<bool, StorageError>;
}

/// Build a fresh public ID of the form `<folder>/<uuid>.<ext>`.
pub fn new_public_id(
    folder: &str,
    kind: MediaKind,
    content_type: &str,
) -> Result<String, StorageError> {
    let folder = folder.trim_matches('/');
    if folder.is_empty() || !is_safe_segment_path(folder) {
        return Err(StorageError::InvalidPublicId(format!(
            "invalid folder '{folder}'"
        )));
    }

    let ext = match kind {
        MediaKind::Document => "pdf",
        MediaKind::Image => mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("img"),
    };

    Ok(format!("{folder}/{}.{ext}", uuid::Uuid::new_v4()))
}

/// Reject public IDs that could escape the store's namespace.
pub fn validate_public_id(public_id: &str) -> Result<(), StorageError> {
    if public_id.is_empty() || public_id.starts_with('/') || !is_safe_segment_path(public_id) {
        return Err(StorageError::InvalidPublicId(public_id.to_string()));
    }
    Ok(())
}

fn is_safe_segment_path(path: &str) -> bool {
    let allowed = path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
    allowed
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        && !path.contains("//")
}
