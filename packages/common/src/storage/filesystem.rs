use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{
    MediaKind, MediaStore, MediaUpload, StoredMedia, new_public_id, validate_public_id,
};

/// Filesystem-backed media store.
///
/// Objects live at `{root}/{public_id}` and are expected to be served
/// statically under `public_base_url`.
pub struct FilesystemMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store, creating the root if needed.
    pub async fn new(
        root: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf, StorageError> {
        validate_public_id(public_id)?;
        Ok(self.root.join(public_id))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(
        &self,
        upload: MediaUpload,
        folder: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError> {
        let public_id = new_public_id(folder, kind, &upload.content_type)?;
        let object_path = self.object_path(&public_id)?;

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &upload.data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base_url, public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> Result<bool, StorageError> {
        let object_path = self.object_path(public_id)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(public_id, "Media object already absent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
