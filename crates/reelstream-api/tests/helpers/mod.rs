//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs against local storage in a temp dir, the in-memory catalog and
//! the fake encoder, so no database, S3 or ffmpeg is needed.
//! Run from workspace root: `cargo test -p reelstream-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use bytes::Bytes;
use reelstream_api::job_queue::{IngestQueue, JobRegistry};
use reelstream_api::setup::routes::setup_routes;
use reelstream_api::AppState;
use reelstream_core::models::{HlsSegment, Movie, NewMovie, DEFAULT_QUALITY_PROFILES};
use reelstream_core::{
    BaseConfig, Config, DatabaseConfig, ServiceConfig, StorageConfig, TranscodeConfig,
    TranscodeMode,
};
use reelstream_db::{InMemoryMovieCatalog, MovieCatalog};
use reelstream_processing::{FakeEncoder, IngestionPipeline, TranscodingEngine};
use reelstream_storage::keys::{master_manifest_key, rendition_key, upload_key, UploadKind};
use reelstream_storage::{LocalStorage, Storage, StorageBackend, UrlSigner};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use storage::CountingStorage;

pub const FILES_BASE_URL: &str = "http://localhost:3000/files";

/// Test application: server plus the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<CountingStorage>,
    pub catalog: Arc<InMemoryMovieCatalog>,
    pub encoder: Arc<FakeEncoder>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Store `video` under a fresh key and create a catalog record for it.
    pub async fn seed_movie(&self, video: &[u8], with_hls: bool) -> Movie {
        let file_name = format!("seed-{}.mp4", Uuid::new_v4().simple());
        let video_key = upload_key(UploadKind::Video, &file_name, 1_700_000_000_000);
        let video_url = self
            .storage
            .put(&video_key, Bytes::copy_from_slice(video), "video/mp4")
            .await
            .expect("Failed to store seed video");

        let (hls_manifest_url, hls_segments) = if with_hls {
            let manifest_key = master_manifest_key(&video_key);
            let manifest_url = self
                .storage
                .put(
                    &manifest_key,
                    Bytes::from_static(b"#EXTM3U\n#EXT-X-VERSION:3\n"),
                    "application/vnd.apple.mpegurl",
                )
                .await
                .expect("Failed to store seed manifest");
            let segments = DEFAULT_QUALITY_PROFILES
                .iter()
                .map(|profile| HlsSegment {
                    quality: profile.label(),
                    url: self.storage.object_url(&rendition_key(
                        &video_key,
                        profile.height,
                        "playlist.m3u8",
                    )),
                })
                .collect();
            (Some(manifest_url), segments)
        } else {
            (None, Vec::new())
        };

        self.catalog
            .create(NewMovie {
                metadata: fixtures::metadata("Seeded"),
                thumbnail_key: String::new(),
                thumbnail_url: String::new(),
                trailer_key: String::new(),
                trailer_url: String::new(),
                video_key,
                video_url,
                hls_manifest_url,
                hls_segments,
            })
            .await
            .expect("Failed to create seed movie")
    }

    /// Catalog record without any stored video.
    pub async fn seed_movie_without_video(&self) -> Movie {
        self.catalog
            .create(NewMovie {
                metadata: fixtures::metadata("Keyless"),
                thumbnail_key: String::new(),
                thumbnail_url: String::new(),
                trailer_key: String::new(),
                trailer_url: String::new(),
                video_key: String::new(),
                video_url: String::new(),
                hls_manifest_url: None,
                hls_segments: Vec::new(),
            })
            .await
            .expect("Failed to create seed movie")
    }
}

pub fn create_test_config(temp_dir: &TempDir) -> Config {
    Config::new(ServiceConfig {
        base: BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            log_format: "text".to_string(),
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 5,
            timeout_seconds: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: temp_dir.path().join("store").to_string_lossy().to_string(),
            local_storage_base_url: FILES_BASE_URL.to_string(),
            url_signing_secret: Some("test-signing-secret".to_string()),
            signed_url_ttl_secs: 3600,
        },
        transcode: TranscodeConfig {
            mode: TranscodeMode::Ffmpeg,
            ffmpeg_path: "ffmpeg".to_string(),
            hls_segment_duration: 10,
            max_video_size_bytes: 64 * 1024 * 1024,
            temp_dir: temp_dir.path().join("scratch"),
            ingest_queue_size: 8,
            max_concurrent_transcodes: 2,
        },
    })
}

/// Setup test app with isolated local storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(&temp_dir);

    let signer = UrlSigner::new("test-signing-secret");
    let local = LocalStorage::new(
        config.local_storage_path(),
        config.local_storage_base_url().to_string(),
        signer.clone(),
    )
    .await
    .expect("Failed to create local storage");
    let storage = Arc::new(CountingStorage::new(local));
    let shared_storage: Arc<dyn Storage> = storage.clone();

    let encoder = Arc::new(FakeEncoder::new(2));
    let transcoder = Arc::new(TranscodingEngine::new(
        encoder.clone(),
        shared_storage.clone(),
    ));
    let catalog = Arc::new(InMemoryMovieCatalog::new());

    tokio::fs::create_dir_all(config.temp_dir())
        .await
        .expect("Failed to create scratch directory");
    let pipeline = Arc::new(IngestionPipeline::new(
        shared_storage.clone(),
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

    let state = Arc::new(AppState {
        config: config.clone(),
        storage: shared_storage,
        catalog: catalog.clone(),
        pipeline,
        ingest_queue,
        url_signer: Some(signer),
    });

    let router = setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage,
        catalog,
        encoder,
        _temp_dir: temp_dir,
    }
}

/// Route path and raw query of a URL minted by the local backend.
pub fn split_files_url(url: &str) -> (String, String) {
    let rest = url
        .strip_prefix("http://localhost:3000")
        .expect("URL is not served by the test app");
    match rest.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (rest.to_string(), String::new()),
    }
}
