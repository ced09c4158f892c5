mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::{MediaKind, MediaStore, MediaUpload, StoredMedia, new_public_id, validate_public_id};
