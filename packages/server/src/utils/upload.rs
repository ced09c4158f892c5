use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use common::storage::{MediaKind, MediaStore, MediaUpload, StoredMedia};

use crate::config::UploadConfig;
use crate::error::AppError;

/// Room for the text fields that travel next to the file in one form.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

/// File-type and size gate applied before any bytes reach the media store.
#[derive(Clone, Copy, Debug)]
pub struct UploadRule {
    pub kind: MediaKind,
    pub max_bytes: u64,
}

impl UploadRule {
    /// PDFs only, for lessons and papers.
    pub fn document(config: &UploadConfig) -> Self {
        Self {
            kind: MediaKind::Document,
            max_bytes: config.max_document_bytes,
        }
    }

    /// Any `image/*` type, for profile logos and homepage images.
    pub fn image(config: &UploadConfig) -> Self {
        Self {
            kind: MediaKind::Image,
            max_bytes: config.max_image_bytes,
        }
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        match self.kind {
            MediaKind::Document => content_type == "application/pdf",
            MediaKind::Image => content_type.starts_with("image/"),
        }
    }

    fn type_error(&self) -> AppError {
        let msg = match self.kind {
            MediaKind::Document => "Invalid file type, only PDF is allowed!",
            MediaKind::Image => "Invalid file type, only images are allowed!",
        };
        AppError::Validation(msg.into())
    }

    /// Request body limit for routes that accept a file under this rule.
    pub fn body_limit(&self) -> DefaultBodyLimit {
        let limit = self.max_bytes.saturating_add(FORM_OVERHEAD_BYTES);
        DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
    }
}

/// Map a multipart read failure to the matching client error.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".into())
    } else {
        AppError::Validation(format!("Multipart error: {}", err.body_text()))
    }
}

/// Read a multipart file field into memory, enforcing `rule` while streaming.
pub async fn read_upload_field(
    mut field: Field<'_>,
    rule: &UploadRule,
) -> Result<MediaUpload, AppError> {
    let content_type = field
        .content_type()
        .map(str::to_owned)
        .or_else(|| {
            field
                .file_name()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.to_string())
        })
        .unwrap_or_default();

    if !rule.accepts(&content_type) {
        return Err(rule.type_error());
    }

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if (data.len() + chunk.len()) as u64 > rule.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds maximum size of {} bytes",
                rule.max_bytes
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(AppError::Validation(
            "Uploaded file is empty or corrupted".into(),
        ));
    }

    Ok(MediaUpload { data, content_type })
}

/// Upload, then run `commit` with the stored locator.
///
/// If `commit` fails, the uploaded object is deleted again and the commit
/// error is returned whatever the outcome of that cleanup.
pub async fn upload_then_commit<T, F, Fut>(
    store: &dyn MediaStore,
    upload: MediaUpload,
    folder: &str,
    kind: MediaKind,
    commit: F,
) -> Result<T, AppError>
where
    F: FnOnce(StoredMedia) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let stored = store.upload(upload, folder, kind).await?;
    let public_id = stored.public_id.clone();

    match commit(stored).await {
        Ok(value) => Ok(value),
        Err(err) => {
            match store.delete(&public_id, kind).await {
                Ok(_) => tracing::warn!(%public_id, "Deleted uploaded file after failed save"),
                Err(cleanup) => tracing::error!(
                    %public_id,
                    error = %cleanup,
                    "CRITICAL: failed to delete orphaned upload"
                ),
            }
            Err(err)
        }
    }
}

/// Delete a stored object on a cascade path. Failures are logged, never raised.
///
/// Returns `true` when the object is known to be gone.
pub async fn delete_best_effort(store: &dyn MediaStore, public_id: &str, kind: MediaKind) -> bool {
    if public_id.is_empty() {
        return true;
    }
    match store.delete(public_id, kind).await {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!(%public_id, "Stored file was already missing");
            true
        }
        Err(e) => {
            tracing::warn!(%public_id, error = %e, "Failed to delete stored file");
            false
        }
    }
}
