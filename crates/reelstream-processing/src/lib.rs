//! Reelstream Processing Library
//!
//! HLS transcoding and the ingestion pipeline that drives it.
//!
//! The [`video::Transcoder`] seam has two implementations: the
//! [`video::TranscodingEngine`], which runs an [`video::Encoder`] per quality
//! profile and uploads the results, and [`video::OfflineTranscoder`], which
//! returns a deterministic result without encoding or uploading anything.

pub mod error;
pub mod ingest;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{IngestError, TranscodeError};
pub use ingest::{FormField, IngestRequest, IngestionPipeline, SourceUpload};
pub use video::{
    Encoder, FakeEncoder, FfmpegEncoder, OfflineTranscoder, TranscodeJob, Transcoder,
    TranscodingEngine,
};
