use async_trait::async_trait;
use reelstream_core::models::{QualityProfile, TranscodeResult};
use std::path::PathBuf;

use crate::error::TranscodeError;

/// One source video to turn into an HLS rendition set.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Staged source file on local disk.
    pub input_path: PathBuf,
    /// Scratch directory for encoder output; removed when the job finishes.
    pub output_dir: PathBuf,
    /// Storage key of the original video; outputs are namespaced beneath it.
    pub video_key: String,
    /// Profiles in the order they should appear in the master manifest.
    pub qualities: Vec<QualityProfile>,
}

/// Produces a complete rendition set for a job, or fails as a whole.
///
/// A successful result carries exactly one rendition per requested profile,
/// in request order.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError>;
}
