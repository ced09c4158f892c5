use async_trait::async_trait;
use ::s3::creds::Credentials;
use ::s3::{Bucket, Region};
use serde::Deserialize;

use super::error::StorageError;
use super::traits::{
    MediaKind, MediaStore, MediaUpload, StoredMedia, new_public_id, validate_public_id,
};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Settings {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
}

fn default_region() -> String {
    "us-east-1".into()
}

/// Media store that relays uploads to an S3-compatible bucket.
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3MediaStore {
    pub fn new(
        settings: &S3Settings,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings
                .region
                .parse()
                .map_err(|e| StorageError::Remote(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Remote(format!("invalid credentials: {e}")))?;

        let bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Remote(e.to_string()))?
            .with_path_style();

        Ok(Self {
            bucket,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        upload: MediaUpload,
        folder: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError> {
        let public_id = new_public_id(folder, kind, &upload.content_type)?;

        let response = self
            .bucket
            .put_object_with_content_type(&public_id, &upload.data, &upload.content_type)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Remote(format!(
                "upload of {public_id} returned status {status}"
            )));
        }

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base_url, public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> Result<bool, StorageError> {
        validate_public_id(public_id)?;

        let response = self
            .bucket
            .delete_object(public_id)
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;

        match response.status_code() {
            200..=299 => Ok(true),
            404 => {
                tracing::debug!(public_id, "Media object already absent");
                Ok(false)
            }
            status => Err(StorageError::Remote(format!(
                "delete of {public_id} returned status {status}"
            ))),
        }
    }
}
