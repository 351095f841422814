//! Configuration validation
//!
//! Startup checks on top of [`Config::validate`] that only matter for the HTTP service.

use anyhow::{Context, Result};
use reelstream_core::{Config, TranscodeMode};

/// Fail fast on configuration the service cannot run with.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    if config.is_production() && config.cors_origins().iter().any(|origin| origin == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via the CORS_ORIGINS environment variable."
        ));
    }

    if config.database_url().is_some() {
        if config.db_max_connections() == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }
        if config.db_timeout_seconds() == 0 {
            return Err(anyhow::anyhow!("Database timeout cannot be 0"));
        }
    }

    if config.max_video_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than 0"));
    }

    if config.transcode_mode() == TranscodeMode::Offline && config.is_production() {
        tracing::warn!("TRANSCODE_MODE=offline in production: ingested movies will reference renditions that were never encoded");
    }

    Ok(())
}
