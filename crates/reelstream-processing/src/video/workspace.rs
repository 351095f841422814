//! Per-job scratch space on the local filesystem.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::TranscodeError;

/// Uniquely named temporary directory holding one job's staged input and encoder output.
///
/// Removed by [`TranscodeWorkspace::cleanup`], or on drop if cleanup never ran.
#[derive(Debug)]
pub struct TranscodeWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl TranscodeWorkspace {
    /// Create `transcode-{millis}-{random}` under `parent`.
    pub async fn create(parent: &Path) -> Result<Self, TranscodeError> {
        tokio::fs::create_dir_all(parent).await?;
        let prefix = format!("transcode-{}-", Utc::now().timestamp_millis());
        let parent = parent.to_path_buf();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix(&prefix).tempdir_in(parent)
        })
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;

        let path = dir.path().to_path_buf();
        tracing::debug!(path = %path.display(), "Transcode workspace created");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the source video is staged, keeping its extension for the encoder.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("mp4");
        self.path.join(format!("input.{}", extension))
    }

    /// Directory the transcoder writes renditions into.
    pub fn output_dir(&self) -> PathBuf {
        self.path.join("hls")
    }

    /// Write the source bytes to the staging file.
    pub async fn stage(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, TranscodeError> {
        let input_path = self.input_path(file_name);
        tokio::fs::write(&input_path, data).await?;
        tracing::debug!(path = %input_path.display(), size_bytes = data.len(), "Source video staged");
        Ok(input_path)
    }

    /// Remove the directory tree. Safe to call more than once.
    pub async fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => tracing::debug!(path = %path.display(), "Transcode workspace removed"),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to remove transcode workspace")
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Workspace cleanup task failed")
            }
        }
    }
}
