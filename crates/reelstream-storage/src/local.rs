use crate::keys::content_type_for_key;
use crate::signing::UrlSigner;
use crate::traits::{
    validate_key, ByteStream, ObjectMeta, SignedUrlOptions, Storage, StorageError, StorageResult,
};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;

/// Suffix of every object file on disk.
const OBJECT_SUFFIX: &str = ".obj";

/// Suffix of every directory on disk. Object `a/b` lives at `a.d/b.obj` and
/// `a/b/c` at `a.d/b.d/c.obj`, so a key and the keys nested under it never
/// collide whatever their segments are named (HLS renditions live under their
/// source video's key).
const DIR_SUFFIX: &str = ".d";

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signer: UrlSigner,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object files (e.g. "./storage")
    /// * `base_url` - URL the API serves objects under (e.g. "http://localhost:3000/files")
    /// * `signer` - Key used to sign and verify direct-access URLs
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signer: UrlSigner,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            signer,
        })
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Convert storage key to filesystem path.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let (dir, name) = match storage_key.rsplit_once('/') {
            Some((dir, name)) => (Some(dir), name),
            None => (None, storage_key),
        };
        let mut path = match dir {
            Some(dir) => self.dir_to_path(dir)?,
            None => self.base_path.clone(),
        };
        if name.is_empty() {
            return Err(empty_segment());
        }
        path.push(format!("{}{}", name, OBJECT_SUFFIX));
        Ok(path)
    }

    /// Directory holding every key that starts with `{dir_key}/`.
    fn dir_to_path(&self, dir_key: &str) -> StorageResult<PathBuf> {
        let mut path = self.base_path.clone();
        for segment in dir_key.split('/') {
            if segment.is_empty() {
                return Err(empty_segment());
            }
            path.push(format!("{}{}", segment, DIR_SUFFIX));
        }
        Ok(path)
    }

    /// Inverse of `key_to_path` for files found while walking the store.
    fn path_to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let (name, dirs) = components.split_last()?;

        let mut segments = dirs
            .iter()
            .map(|d| d.strip_suffix(DIR_SUFFIX))
            .collect::<Option<Vec<_>>>()?;
        segments.push(name.strip_suffix(OBJECT_SUFFIX)?);
        Some(segments.join("/"))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn open_existing(&self, storage_key: &str) -> StorageResult<(PathBuf, fs::File)> {
        let path = self.key_to_path(storage_key)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to open file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Every object file beneath `dir`, depth-first.
    async fn walk_files(dir: &Path) -> StorageResult<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            dirs.push(current);
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    pending.push(entry.path());
                } else {
                    files.push(entry.path());
                }
            }
        }

        Ok((files, dirs))
    }
}

fn empty_segment() -> StorageError {
    StorageError::InvalidKey("Storage key contains an empty segment".to_string())
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let (path, mut file) = self.open_existing(storage_key).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        Ok(data)
    }

    async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let (_, file) = self.open_existing(storage_key).await?;
        let stream = ReaderStream::new(file).map(|chunk| chunk.map_err(StorageError::from));
        Ok(Box::pin(stream))
    }

    async fn get_range_stream(
        &self,
        storage_key: &str,
        start: u64,
        end: u64,
    ) -> StorageResult<ByteStream> {
        let (path, mut file) = self.open_existing(storage_key).await?;
        let size = file.metadata().await?.len();
        if start > end || start >= size {
            return Err(StorageError::InvalidRange { start, end, size });
        }

        file.seek(SeekFrom::Start(start)).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to seek {}: {}", path.display(), e))
        })?;

        let length = end.min(size - 1) - start + 1;
        let stream =
            ReaderStream::new(file.take(length)).map(|chunk| chunk.map_err(StorageError::from));
        Ok(Box::pin(stream))
    }

    async fn head(&self, storage_key: &str) -> StorageResult<ObjectMeta> {
        let path = self.key_to_path(storage_key)?;
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(ObjectMeta {
                size: metadata.len(),
                content_type: Some(content_type_for_key(storage_key).to_string()),
            }),
            Ok(_) => Err(StorageError::NotFound(storage_key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = %storage_key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize> {
        validate_key(prefix)?;

        // Walk only the deepest directory the prefix fully names.
        let root = match prefix.rsplit_once('/') {
            Some((dir, _)) => self.dir_to_path(dir)?,
            None => self.base_path.clone(),
        };

        let (files, mut dirs) = Self::walk_files(&root).await?;
        let mut deleted = 0;
        for file in files {
            let Some(key) = self.path_to_key(&file) else {
                continue;
            };
            if key.starts_with(prefix) {
                fs::remove_file(&file).await.map_err(|e| {
                    StorageError::DeleteFailed(format!(
                        "Failed to delete file {}: {}",
                        file.display(),
                        e
                    ))
                })?;
                deleted += 1;
            }
        }

        // Deepest first; non-empty directories are left alone.
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for dir in dirs {
            if dir != self.base_path {
                let _ = fs::remove_dir(&dir).await;
            }
        }

        tracing::debug!(prefix = %prefix, deleted, "Local storage prefix delete complete");
        Ok(deleted)
    }

    async fn signed_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
        options: &SignedUrlOptions,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let params = self.signer.sign(storage_key, expires_in, options)?;
        Ok(format!("{}?{}", self.generate_url(storage_key), params.to_query()))
    }

    fn object_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
