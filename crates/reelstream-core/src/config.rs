//! Configuration module
//!
//! Service configuration is read once from the environment (with `.env` support)
//! and shared as an immutable [`Config`] handle. Numeric settings fall back to
//! their defaults when missing or unparsable; [`Config::validate`] catches the
//! combinations that cannot work.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: usize = 2048;
const HLS_SEGMENT_DURATION: u64 = 10;
const SIGNED_URL_TTL_SECS: u64 = 3600;
const INGEST_QUEUE_SIZE: usize = 16;
const MAX_CONCURRENT_TRANSCODES: usize = 2;

/// Which transcoder the ingestion pipeline is wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeMode {
    /// Run the FFmpeg encoder and upload every artifact.
    Ffmpeg,
    /// Return a deterministic result without encoding or uploading.
    Offline,
}

impl std::str::FromStr for TranscodeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ffmpeg" => Ok(TranscodeMode::Ffmpeg),
            "offline" => Ok(TranscodeMode::Offline),
            _ => Err(anyhow::anyhow!("Invalid transcode mode: {}", s)),
        }
    }
}

/// HTTP server and runtime settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
}

/// Catalog database settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

/// Object storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub url_signing_secret: Option<String>,
    pub signed_url_ttl_secs: u64,
}

/// Transcoding and ingestion settings
#[derive(Clone, Debug)]
pub struct TranscodeConfig {
    pub mode: TranscodeMode,
    pub ffmpeg_path: String,
    pub hls_segment_duration: u64,
    pub max_video_size_bytes: usize,
    pub temp_dir: PathBuf,
    pub ingest_queue_size: usize,
    pub max_concurrent_transcodes: usize,
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub transcode: TranscodeConfig,
}

/// Shared configuration handle.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    pub fn new(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.0.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.0.base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.0.database.url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.database.max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.0.database.timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.0.storage.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.0.storage.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.storage.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.0.storage.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.0.storage.local_storage_base_url
    }

    pub fn url_signing_secret(&self) -> Option<&str> {
        self.0.storage.url_signing_secret.as_deref()
    }

    pub fn signed_url_ttl_secs(&self) -> u64 {
        self.0.storage.signed_url_ttl_secs
    }

    pub fn transcode_mode(&self) -> TranscodeMode {
        self.0.transcode.mode
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.0.transcode.ffmpeg_path
    }

    pub fn hls_segment_duration(&self) -> u64 {
        self.0.transcode.hls_segment_duration
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.0.transcode.max_video_size_bytes
    }

    pub fn temp_dir(&self) -> &std::path::Path {
        &self.0.transcode.temp_dir
    }

    pub fn ingest_queue_size(&self) -> usize {
        self.0.transcode.ingest_queue_size
    }

    pub fn max_concurrent_transcodes(&self) -> usize {
        self.0.transcode.max_concurrent_transcodes
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .unwrap_or(SERVER_PORT);

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let base = BaseConfig {
            server_port,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            environment,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./storage".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/files", server_port)),
            url_signing_secret: env::var("URL_SIGNING_SECRET").ok(),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_SECS),
        };

        let mode = match env::var("TRANSCODE_MODE") {
            Ok(value) => value.parse::<TranscodeMode>()?,
            Err(_) => TranscodeMode::Ffmpeg,
        };

        let transcode = TranscodeConfig {
            mode,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            hls_segment_duration: env::var("HLS_SEGMENT_DURATION")
                .unwrap_or_else(|_| HLS_SEGMENT_DURATION.to_string())
                .parse()
                .unwrap_or(HLS_SEGMENT_DURATION),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            temp_dir: env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            ingest_queue_size: env::var("INGEST_QUEUE_SIZE")
                .unwrap_or_else(|_| INGEST_QUEUE_SIZE.to_string())
                .parse()
                .unwrap_or(INGEST_QUEUE_SIZE),
            max_concurrent_transcodes: env::var("MAX_CONCURRENT_TRANSCODES")
                .unwrap_or_else(|_| MAX_CONCURRENT_TRANSCODES.to_string())
                .parse()
                .unwrap_or(MAX_CONCURRENT_TRANSCODES),
        };

        Ok(ServiceConfig {
            base,
            database,
            storage,
            transcode,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.backend == StorageBackend::S3 {
            if self.storage.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if self.storage.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
        }

        let production = matches!(
            self.base.environment.to_lowercase().as_str(),
            "production" | "prod"
        );
        if production
            && self.storage.backend == StorageBackend::Local
            && self.storage.url_signing_secret.is_none()
        {
            return Err(anyhow::anyhow!(
                "URL_SIGNING_SECRET must be set in production when using local storage"
            ));
        }

        if self.transcode.hls_segment_duration == 0 {
            return Err(anyhow::anyhow!("HLS_SEGMENT_DURATION must be greater than 0"));
        }
        if self.transcode.ingest_queue_size == 0 {
            return Err(anyhow::anyhow!("INGEST_QUEUE_SIZE must be at least 1"));
        }
        if self.transcode.max_concurrent_transcodes == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_TRANSCODES must be at least 1"));
        }
        if self.storage.signed_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("SIGNED_URL_TTL_SECS must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceConfig {
        ServiceConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                log_format: "text".to_string(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                timeout_seconds: 5,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                s3_bucket: None,
                s3_region: None,
                s3_endpoint: None,
                local_storage_path: "./storage".to_string(),
                local_storage_base_url: "http://localhost:3000/files".to_string(),
                url_signing_secret: None,
                signed_url_ttl_secs: 3600,
            },
            transcode: TranscodeConfig {
                mode: TranscodeMode::Offline,
                ffmpeg_path: "ffmpeg".to_string(),
                hls_segment_duration: 10,
                max_video_size_bytes: 1024,
                temp_dir: std::env::temp_dir(),
                ingest_queue_size: 4,
                max_concurrent_transcodes: 1,
            },
        }
    }

    #[test]
    fn test_local_development_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_s3_requires_bucket_and_region() {
        let mut config = sample();
        config.storage.backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.storage.s3_bucket = Some("movies".to_string());
        assert!(config.validate().is_err());

        config.storage.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_local_requires_signing_secret() {
        let mut config = sample();
        config.base.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.storage.url_signing_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_segment_duration_rejected() {
        let mut config = sample();
        config.transcode.hls_segment_duration = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transcode_mode_from_str() {
        assert_eq!("ffmpeg".parse::<TranscodeMode>().unwrap(), TranscodeMode::Ffmpeg);
        assert_eq!("OFFLINE".parse::<TranscodeMode>().unwrap(), TranscodeMode::Offline);
        assert!("gpu".parse::<TranscodeMode>().is_err());
    }
}
