//! Error types for transcoding and ingestion.

use reelstream_core::AppError;
use reelstream_db::CatalogError;
use reelstream_storage::StorageError;
use thiserror::Error;

/// Failure of one transcode job. Every variant is fatal to the job.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),

    #[error("Encoding {quality} rendition failed: {message}")]
    EncodeFailed { quality: String, message: String },

    #[error("Uploading {artifact} failed: {source}")]
    UploadFailed {
        artifact: String,
        #[source]
        source: StorageError,
    },

    #[error("Writing master manifest failed: {0}")]
    ManifestWriteFailed(String),

    #[error("Transcode workspace error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one ingestion request.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request rejected before any side effect.
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl IngestError {
    pub fn validation(message: impl Into<String>) -> Self {
        IngestError::Validation(message.into())
    }
}

impl From<TranscodeError> for AppError {
    fn from(err: TranscodeError) -> Self {
        AppError::Transcode(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(message) => AppError::Validation(message),
            IngestError::Storage(e) => AppError::Storage(e.to_string()),
            IngestError::Transcode(e) => e.into(),
            IngestError::Catalog(e) => e.into(),
        }
    }
}
