//! Deterministic encoder for tests and environments without ffmpeg.

use async_trait::async_trait;
use reelstream_core::models::QualityProfile;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::encoder::{Encoder, RenditionOutput, RENDITION_PLAYLIST};
use crate::error::TranscodeError;

/// Writes placeholder playlists and segments instead of encoding.
///
/// Output depends only on the profile and segment count, so repeated runs
/// produce byte-identical artifacts.
#[derive(Debug)]
pub struct FakeEncoder {
    segments_per_rendition: usize,
    fail_height: Option<u32>,
    calls: AtomicUsize,
    encoded: Mutex<Vec<String>>,
}

impl Default for FakeEncoder {
    fn default() -> Self {
        Self::new(2)
    }
}

impl FakeEncoder {
    pub fn new(segments_per_rendition: usize) -> Self {
        Self {
            segments_per_rendition: segments_per_rendition.max(1),
            fail_height: None,
            calls: AtomicUsize::new(0),
            encoded: Mutex::new(Vec::new()),
        }
    }

    /// Fail with `EncodeFailed` when asked for this height.
    pub fn failing_at(mut self, height: u32) -> Self {
        self.fail_height = Some(height);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Labels encoded so far, in call order.
    pub fn encoded_labels(&self) -> Vec<String> {
        self.encoded
            .lock()
            .map(|labels| labels.clone())
            .unwrap_or_default()
    }

    fn playlist(&self, segment_names: &[String]) -> String {
        let mut playlist = String::from(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:0\n",
        );
        for name in segment_names {
            playlist.push_str("#EXTINF:10.000000,\n");
            playlist.push_str(name);
            playlist.push('\n');
        }
        playlist.push_str("#EXT-X-ENDLIST\n");
        playlist
    }
}

#[async_trait]
impl Encoder for FakeEncoder {
    async fn encode_rendition(
        &self,
        _input: &Path,
        output_dir: &Path,
        profile: &QualityProfile,
    ) -> Result<RenditionOutput, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut labels) = self.encoded.lock() {
            labels.push(profile.label());
        }

        if self.fail_height == Some(profile.height) {
            return Err(TranscodeError::EncodeFailed {
                quality: profile.label(),
                message: "fake encoder configured to fail".to_string(),
            });
        }

        let segment_names: Vec<String> = (0..self.segments_per_rendition)
            .map(|i| format!("segment_{:03}.ts", i))
            .collect();

        let mut segment_paths: Vec<PathBuf> = Vec::with_capacity(segment_names.len());
        for name in &segment_names {
            let path = output_dir.join(name);
            let body = format!("{}:{}", profile, name);
            tokio::fs::write(&path, body.as_bytes()).await?;
            segment_paths.push(path);
        }

        let playlist_path = output_dir.join(RENDITION_PLAYLIST);
        tokio::fs::write(&playlist_path, self.playlist(&segment_names)).await?;

        Ok(RenditionOutput {
            playlist_path,
            segment_paths,
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
