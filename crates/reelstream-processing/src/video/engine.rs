//! Transcoding engine: encode each profile, upload its artifacts, then publish the master manifest.

use async_trait::async_trait;
use bytes::Bytes;
use reelstream_core::models::{QualityProfile, RenditionResult, TranscodeResult};
use reelstream_storage::keys::{content_type_for_key, master_manifest_key, rendition_key};
use reelstream_storage::Storage;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use super::encoder::{Encoder, RenditionOutput};
use super::manifest::build_master_playlist;
use super::transcoder::{TranscodeJob, Transcoder};
use crate::error::TranscodeError;

const MANIFEST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

pub struct TranscodingEngine {
    encoder: Arc<dyn Encoder>,
    storage: Arc<dyn Storage>,
}

impl TranscodingEngine {
    pub fn new(encoder: Arc<dyn Encoder>, storage: Arc<dyn Storage>) -> Self {
        Self { encoder, storage }
    }

    async fn run(&self, job: &TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        if job.qualities.is_empty() {
            return Err(TranscodeError::EncodeFailed {
                quality: "none".to_string(),
                message: "no quality profiles requested".to_string(),
            });
        }

        let mut renditions = Vec::with_capacity(job.qualities.len());
        for profile in &job.qualities {
            let rendition_dir = job.output_dir.join(profile.label());
            tokio::fs::create_dir_all(&rendition_dir).await?;

            let output = self
                .encoder
                .encode_rendition(&job.input_path, &rendition_dir, profile)
                .await?;
            let rendition = self.upload_rendition(&job.video_key, profile, output).await?;

            tracing::info!(
                video_key = %job.video_key,
                quality = %rendition.quality,
                segments = rendition.segment_keys.len(),
                "Rendition uploaded"
            );
            renditions.push(rendition);
        }

        let manifest = build_master_playlist(&renditions);
        let manifest_key = master_manifest_key(&job.video_key);
        let manifest_url = self
            .storage
            .put(&manifest_key, Bytes::from(manifest), MANIFEST_CONTENT_TYPE)
            .await
            .map_err(|e| TranscodeError::ManifestWriteFailed(e.to_string()))?;

        Ok(TranscodeResult {
            manifest_key,
            manifest_url,
            renditions,
        })
    }

    /// Segments first, then the playlist that references them.
    async fn upload_rendition(
        &self,
        video_key: &str,
        profile: &QualityProfile,
        output: RenditionOutput,
    ) -> Result<RenditionResult, TranscodeError> {
        let mut segment_keys = Vec::with_capacity(output.segment_paths.len());
        for path in &output.segment_paths {
            let key = self.upload_artifact(video_key, profile, path).await?.0;
            segment_keys.push(key);
        }

        let (playlist_key, url) = self
            .upload_artifact(video_key, profile, &output.playlist_path)
            .await?;

        Ok(RenditionResult {
            quality: profile.label(),
            playlist_key,
            url,
            segment_keys,
        })
    }

    async fn upload_artifact(
        &self,
        video_key: &str,
        profile: &QualityProfile,
        path: &Path,
    ) -> Result<(String, String), TranscodeError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TranscodeError::EncodeFailed {
                quality: profile.label(),
                message: format!("invalid artifact path {}", path.display()),
            })?;
        let key = rendition_key(video_key, profile.height, file_name);
        let data = tokio::fs::read(path).await?;

        let url = self
            .storage
            .put(&key, Bytes::from(data), content_type_for_key(&key))
            .await
            .map_err(|source| TranscodeError::UploadFailed {
                artifact: key.clone(),
                source,
            })?;
        Ok((key, url))
    }
}

async fn remove_output_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(error = %e, path = %dir.display(), "Failed to remove transcode output")
        }
    }
}

#[async_trait]
impl Transcoder for TranscodingEngine {
    #[tracing::instrument(skip(self, job), fields(video_key = %job.video_key, encoder = self.encoder.name()))]
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        let start = std::time::Instant::now();
        let result = match tokio::fs::create_dir_all(&job.output_dir).await {
            Ok(()) => self.run(&job).await,
            Err(e) => Err(e.into()),
        };
        remove_output_dir(&job.output_dir).await;

        match &result {
            Ok(transcoded) => tracing::info!(
                renditions = transcoded.renditions.len(),
                manifest_key = %transcoded.manifest_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Transcode complete"
            ),
            Err(e) => tracing::error!(
                error = %e,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Transcode failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FlakyStorage;
    use crate::video::fake::FakeEncoder;
    use reelstream_core::models::DEFAULT_QUALITY_PROFILES;
    use reelstream_storage::{LocalStorage, UrlSigner};

    struct Fixture {
        _root: tempfile::TempDir,
        scratch: std::path::PathBuf,
        storage: Arc<LocalStorage>,
    }

    async fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(
            root.path().join("store"),
            "http://localhost:3000/files".to_string(),
            UrlSigner::new("secret"),
        )
        .await
        .unwrap();
        let scratch = root.path().join("scratch");
        tokio::fs::create_dir_all(&scratch).await.unwrap();
        tokio::fs::write(scratch.join("input.mp4"), b"source").await.unwrap();
        Fixture {
            _root: root,
            scratch,
            storage: Arc::new(storage),
        }
    }

    fn job(fixture: &Fixture, qualities: &[QualityProfile]) -> TranscodeJob {
        TranscodeJob {
            input_path: fixture.scratch.join("input.mp4"),
            output_dir: fixture.scratch.join("hls"),
            video_key: "videos/1-movie.mp4".to_string(),
            qualities: qualities.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_one_rendition_per_profile_in_order() {
        let fixture = fixture().await;
        let encoder = Arc::new(FakeEncoder::new(2));
        let engine = TranscodingEngine::new(encoder.clone(), fixture.storage.clone());

        let job = job(&fixture, &DEFAULT_QUALITY_PROFILES);
        let output_dir = job.output_dir.clone();
        let result = engine.transcode(job).await.unwrap();

        let labels: Vec<_> = result.renditions.iter().map(|r| r.quality.as_str()).collect();
        assert_eq!(labels, vec!["240p", "360p", "480p", "720p"]);
        assert_eq!(encoder.encoded_labels(), labels);
        assert_eq!(result.manifest_key, "videos/1-movie.mp4/hls/master.m3u8");
        assert!(!output_dir.exists());

        for rendition in &result.renditions {
            assert_eq!(rendition.segment_keys.len(), 2);
            assert!(fixture.storage.exists(&rendition.playlist_key).await.unwrap());
            for key in &rendition.segment_keys {
                assert!(fixture.storage.exists(key).await.unwrap());
            }
        }

        let manifest = fixture.storage.get(&result.manifest_key).await.unwrap();
        let manifest = String::from_utf8(manifest).unwrap();
        assert_eq!(manifest.matches("#EXT-X-STREAM-INF").count(), 4);
        assert!(manifest.contains(&result.renditions[3].url));
    }

    #[tokio::test]
    async fn test_encode_failure_publishes_no_manifest_and_cleans_up() {
        let fixture = fixture().await;
        let encoder = Arc::new(FakeEncoder::new(1).failing_at(480));
        let engine = TranscodingEngine::new(encoder.clone(), fixture.storage.clone());

        let job = job(&fixture, &DEFAULT_QUALITY_PROFILES);
        let output_dir = job.output_dir.clone();
        let err = engine.transcode(job).await.unwrap_err();

        assert!(matches!(err, TranscodeError::EncodeFailed { ref quality, .. } if quality == "480p"));
        assert_eq!(encoder.calls(), 3);
        assert!(!output_dir.exists());
        assert!(!fixture
            .storage
            .exists("videos/1-movie.mp4/hls/master.m3u8")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_artifact_upload_failure_is_fatal() {
        let fixture = fixture().await;
        // Two segments plus a playlist per rendition: put #6 is the 360p playlist.
        let storage = Arc::new(FlakyStorage::failing_on_put((*fixture.storage).clone(), 6));
        let encoder = Arc::new(FakeEncoder::new(2));
        let engine = TranscodingEngine::new(encoder.clone(), storage.clone());

        let job = job(&fixture, &DEFAULT_QUALITY_PROFILES);
        let output_dir = job.output_dir.clone();
        let err = engine.transcode(job).await.unwrap_err();

        match err {
            TranscodeError::UploadFailed { artifact, .. } => {
                assert_eq!(artifact, "videos/1-movie.mp4/hls/360p/playlist.m3u8")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(encoder.calls(), 2);
        assert_eq!(storage.puts(), 6);
        assert!(!output_dir.exists());
        assert!(!fixture
            .storage
            .exists("videos/1-movie.mp4/hls/master.m3u8")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_manifest_write_failure_is_fatal() {
        let fixture = fixture().await;
        let storage = Arc::new(FlakyStorage::failing_on_put((*fixture.storage).clone(), 13));
        let encoder = Arc::new(FakeEncoder::new(2));
        let engine = TranscodingEngine::new(encoder.clone(), storage.clone());

        let job = job(&fixture, &DEFAULT_QUALITY_PROFILES);
        let output_dir = job.output_dir.clone();
        let err = engine.transcode(job).await.unwrap_err();

        assert!(matches!(err, TranscodeError::ManifestWriteFailed(_)));
        assert_eq!(encoder.calls(), 4);
        assert!(!output_dir.exists());
        assert!(!fixture
            .storage
            .exists("videos/1-movie.mp4/hls/master.m3u8")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_empty_profile_list_is_rejected() {
        let fixture = fixture().await;
        let engine = TranscodingEngine::new(Arc::new(FakeEncoder::default()), fixture.storage.clone());
        let job = job(&fixture, &[]);
        let output_dir = job.output_dir.clone();
        assert!(engine.transcode(job).await.is_err());
        assert!(!output_dir.exists());
    }
}
