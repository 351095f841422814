//! Encoder strategy: turns a staged source file into one HLS rendition on local disk.

use async_trait::async_trait;
use reelstream_core::models::QualityProfile;
use std::path::{Path, PathBuf};

use crate::error::TranscodeError;

/// Rendition playlist file name inside each rendition directory.
pub const RENDITION_PLAYLIST: &str = "playlist.m3u8";

/// Local files produced for one rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenditionOutput {
    pub playlist_path: PathBuf,
    /// Segment files in playback order.
    pub segment_paths: Vec<PathBuf>,
}

#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode `input` at `profile` into `output_dir`, which already exists and is empty.
    async fn encode_rendition(
        &self,
        input: &Path,
        output_dir: &Path,
        profile: &QualityProfile,
    ) -> Result<RenditionOutput, TranscodeError>;

    fn name(&self) -> &'static str;
}

/// Collect the `.ts` segments written into `dir`, sorted by file name.
pub async fn collect_segments(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut segments = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ts") {
            segments.push(path);
        }
    }
    segments.sort();
    Ok(segments)
}
