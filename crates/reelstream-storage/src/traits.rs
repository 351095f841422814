use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

use crate::StorageBackend;
use reelstream_core::AppError;

/// Error types for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid range {start}-{end} for object of {size} bytes")]
    InvalidRange { start: u64, end: u64, size: u64 },

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(message) => AppError::InvalidInput(message),
            StorageError::InvalidRange { size, .. } => AppError::RangeNotSatisfiable { size },
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Chunked body of a stored object (or a byte range of it).
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Size and type of a stored object, as reported by a head request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub size: u64,
    pub content_type: Option<String>,
}

/// Response hints baked into a signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlOptions {
    pub content_disposition: String,
    pub content_type: String,
}

impl SignedUrlOptions {
    /// Inline playback of an MP4 video in the browser.
    pub fn inline_video() -> Self {
        Self {
            content_disposition: "inline".to_string(),
            content_type: "video/mp4".to_string(),
        }
    }
}

/// Object storage capability: opaque byte blobs addressed by key.
///
/// Implementations must tolerate concurrent writes to distinct keys.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key`, returning the object's URL.
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str)
        -> StorageResult<String>;

    /// Read a whole object into memory.
    async fn get(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Stream a whole object.
    async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Stream bytes `start..=end` of an object.
    ///
    /// Callers validate the range against [`Storage::head`] first; backends
    /// reject ranges that start past the end of the object.
    async fn get_range_stream(
        &self,
        storage_key: &str,
        start: u64,
        end: u64,
    ) -> StorageResult<ByteStream>;

    /// Object size and content type, or [`StorageError::NotFound`].
    async fn head(&self, storage_key: &str) -> StorageResult<ObjectMeta>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        match self.head(storage_key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete one object. Deleting a missing object is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Delete every object whose key starts with `prefix`, returning how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize>;

    /// Time-limited URL granting direct read access to one object.
    async fn signed_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
        options: &SignedUrlOptions,
    ) -> StorageResult<String>;

    /// Unsigned URL of an object.
    fn object_url(&self, storage_key: &str) -> String;

    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape the storage namespace.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
