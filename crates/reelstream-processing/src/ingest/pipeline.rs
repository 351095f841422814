//! Ingestion pipeline: upload parts, stage and transcode the video, persist the catalog record.

use chrono::Utc;
use reelstream_core::models::{Movie, NewMovie, QualityProfile, TranscodeResult};
use reelstream_db::MovieCatalog;
use reelstream_storage::keys::{upload_key, UploadKind};
use reelstream_storage::Storage;
use std::path::PathBuf;
use std::sync::Arc;

use super::request::{IngestRequest, SourceUpload};
use crate::error::{IngestError, TranscodeError};
use crate::video::{TranscodeJob, TranscodeWorkspace, Transcoder};

/// A file part after it has been written to the object store.
#[derive(Debug, Clone)]
struct StoredPart {
    key: String,
    url: String,
}

/// Runs one ingestion end to end. There is no automatic retry; a failed
/// request is resubmitted by the caller and gets fresh keys.
///
/// Objects uploaded before a later step fails are left in place.
pub struct IngestionPipeline {
    storage: Arc<dyn Storage>,
    transcoder: Arc<dyn Transcoder>,
    catalog: Arc<dyn MovieCatalog>,
    qualities: Vec<QualityProfile>,
    temp_root: PathBuf,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        transcoder: Arc<dyn Transcoder>,
        catalog: Arc<dyn MovieCatalog>,
        qualities: Vec<QualityProfile>,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            storage,
            transcoder,
            catalog,
            qualities,
            temp_root,
        }
    }

    pub fn qualities(&self) -> &[QualityProfile] {
        &self.qualities
    }

    async fn upload_part(
        &self,
        kind: UploadKind,
        upload: &SourceUpload,
        timestamp_millis: i64,
    ) -> Result<StoredPart, IngestError> {
        let key = upload_key(kind, &upload.file_name, timestamp_millis);
        let url = self
            .storage
            .put(&key, upload.data.clone(), &upload.content_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, part = %kind, "Upload failed");
                e
            })?;
        tracing::info!(key = %key, part = %kind, size_bytes = upload.size(), "Part uploaded");
        Ok(StoredPart { key, url })
    }

    /// Stage the source in a fresh workspace and transcode it. The workspace
    /// is removed before returning, whatever the outcome.
    async fn transcode(
        &self,
        video: SourceUpload,
        video_key: &str,
    ) -> Result<TranscodeResult, TranscodeError> {
        let mut workspace = TranscodeWorkspace::create(&self.temp_root).await?;

        let result = match workspace.stage(&video.file_name, &video.data).await {
            Ok(input_path) => {
                drop(video);
                self.transcoder
                    .transcode(TranscodeJob {
                        input_path,
                        output_dir: workspace.output_dir(),
                        video_key: video_key.to_string(),
                        qualities: self.qualities.clone(),
                    })
                    .await
            }
            Err(e) => Err(e),
        };

        workspace.cleanup().await;
        result
    }

    #[tracing::instrument(skip(self, request), fields(title = %request.metadata.title))]
    pub async fn ingest(&self, request: IngestRequest) -> Result<Movie, IngestError> {
        let start = std::time::Instant::now();
        let IngestRequest {
            video,
            thumbnail,
            trailer,
            metadata,
        } = request;
        let now = Utc::now().timestamp_millis();

        let thumbnail = self.upload_part(UploadKind::Thumbnail, &thumbnail, now).await?;
        let original = self.upload_part(UploadKind::Video, &video, now).await?;
        let trailer = match self.upload_part(UploadKind::Trailer, &trailer, now).await {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!(
                    orphaned = ?[&thumbnail.key, &original.key],
                    "Ingestion aborted; uploaded objects left in place"
                );
                return Err(e);
            }
        };

        let transcoded = match self.transcode(video, &original.key).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    orphaned = ?[&thumbnail.key, &original.key, &trailer.key],
                    "Ingestion aborted; uploaded objects left in place"
                );
                return Err(e.into());
            }
        };

        let movie = self
            .catalog
            .create(NewMovie {
                metadata,
                thumbnail_key: thumbnail.key,
                thumbnail_url: thumbnail.url,
                trailer_key: trailer.key,
                trailer_url: trailer.url,
                video_key: original.key,
                video_url: original.url,
                hls_segments: transcoded.hls_segments(),
                hls_manifest_url: Some(transcoded.manifest_url),
            })
            .await?;

        tracing::info!(
            movie_id = %movie.id,
            video_key = %movie.video_key,
            renditions = movie.hls_segments.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Movie ingested"
        );
        Ok(movie)
    }
}
