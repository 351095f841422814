//! Transcoder that neither encodes nor uploads.

use async_trait::async_trait;
use reelstream_core::models::{RenditionResult, TranscodeResult};
use reelstream_storage::keys::{master_manifest_key, rendition_key};

use super::encoder::RENDITION_PLAYLIST;
use super::transcoder::{TranscodeJob, Transcoder};
use crate::error::TranscodeError;

/// Returns the result a real transcode of the job would produce, without
/// touching the encoder or the object store.
///
/// URLs are `{base_url}/{key}` and every rendition lists a single segment.
#[derive(Debug, Clone)]
pub struct OfflineTranscoder {
    base_url: String,
}

impl OfflineTranscoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Transcoder for OfflineTranscoder {
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        let renditions = job
            .qualities
            .iter()
            .map(|profile| {
                let playlist_key = rendition_key(&job.video_key, profile.height, RENDITION_PLAYLIST);
                RenditionResult {
                    quality: profile.label(),
                    url: self.url(&playlist_key),
                    playlist_key,
                    segment_keys: vec![rendition_key(
                        &job.video_key,
                        profile.height,
                        "segment_000.ts",
                    )],
                }
            })
            .collect();

        let manifest_key = master_manifest_key(&job.video_key);
        tracing::debug!(video_key = %job.video_key, "Offline transcode result generated");

        Ok(TranscodeResult {
            manifest_url: self.url(&manifest_key),
            manifest_key,
            renditions,
        })
    }
}
