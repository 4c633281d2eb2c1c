//! Uploaded image storage.

mod local;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub use local::LocalImageStore;

/// Largest accepted image upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// An uploaded image awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Name the client sent with the file.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write image")]
    Io(#[from] std::io::Error),

    #[error("image url is not managed by this store")]
    ForeignUrl,
}

#[automock]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an upload and return its public URL.
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError>;

    /// Delete a previously stored image by its public URL. Missing files are ignored.
    async fn remove(&self, url: &str) -> Result<(), StorageError>;
}
