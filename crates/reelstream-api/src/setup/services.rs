//! Service initialization and application state setup

use anyhow::{Context, Result};
use reelstream_core::models::DEFAULT_QUALITY_PROFILES;
use reelstream_core::{Config, TranscodeMode};
use reelstream_db::{InMemoryMovieCatalog, MovieCatalog, PgMovieCatalog};
use reelstream_processing::{
    FfmpegEncoder, IngestionPipeline, OfflineTranscoder, Transcoder, TranscodingEngine,
};
use reelstream_storage::{Storage, UrlSigner};
use sqlx::PgPool;
use std::sync::Arc;

use crate::job_queue::{IngestQueue, JobRegistry};
use crate::state::AppState;

fn build_transcoder(config: &Config, storage: &Arc<dyn Storage>) -> Arc<dyn Transcoder> {
    match config.transcode_mode() {
        TranscodeMode::Ffmpeg => {
            let encoder = FfmpegEncoder::new(config.ffmpeg_path(), config.hls_segment_duration());
            tracing::info!(
                ffmpeg_path = %config.ffmpeg_path(),
                segment_duration = config.hls_segment_duration(),
                "Using FFmpeg transcoding engine"
            );
            Arc::new(TranscodingEngine::new(Arc::new(encoder), storage.clone()))
        }
        TranscodeMode::Offline => {
            tracing::warn!("Using offline transcoder; no renditions will be encoded");
            Arc::new(OfflineTranscoder::new(storage.object_url("")))
        }
    }
}

/// Wire storage, catalog, pipeline and ingest queue into the application state.
pub async fn initialize_services(
    config: &Config,
    pool: Option<PgPool>,
    storage: Arc<dyn Storage>,
    url_signer: Option<UrlSigner>,
) -> Result<Arc<AppState>> {
    let catalog: Arc<dyn MovieCatalog> = match pool {
        Some(pool) => Arc::new(PgMovieCatalog::new(pool)),
        None => Arc::new(InMemoryMovieCatalog::new()),
    };
    tracing::info!(backend = catalog.backend_name(), "Movie catalog initialized");

    tokio::fs::create_dir_all(config.temp_dir())
        .await
        .with_context(|| format!("Failed to create temp dir {}", config.temp_dir().display()))?;

    let transcoder = build_transcoder(config, &storage);
    let pipeline = Arc::new(IngestionPipeline::new(
        storage.clone(),
        transcoder,
        catalog.clone(),
        DEFAULT_QUALITY_PROFILES.to_vec(),
        config.temp_dir().to_path_buf(),
    ));

    let ingest_queue = IngestQueue::new(
        pipeline.clone(),
        JobRegistry::new(),
        config.ingest_queue_size(),
        config.max_concurrent_transcodes(),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        storage,
        catalog,
        pipeline,
        ingest_queue,
        url_signer,
    }))
}
