use thiserror::Error;

/// Errors that can occur while relaying media to or from a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred on the local filesystem backend.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The public ID does not name an object this store could have produced.
    #[error("invalid public id: {0}")]
    InvalidPublicId(String),
    /// The remote store rejected the request or could not be reached.
    #[error("remote store error: {0}")]
    Remote(String),
}
