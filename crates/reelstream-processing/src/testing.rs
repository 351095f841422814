//! Storage double for failure-path tests.

use async_trait::async_trait;
use bytes::Bytes;
use reelstream_storage::{
    ByteStream, LocalStorage, ObjectMeta, SignedUrlOptions, Storage, StorageBackend, StorageError,
    StorageResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Local storage whose n-th `put` (1-based) fails with `UploadFailed`.
pub struct FlakyStorage {
    inner: LocalStorage,
    fail_on_put: usize,
    puts: AtomicUsize,
}

impl FlakyStorage {
    pub fn failing_on_put(inner: LocalStorage, fail_on_put: usize) -> Self {
        Self {
            inner,
            fail_on_put,
            puts: AtomicUsize::new(0),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on_put {
            return Err(StorageError::UploadFailed(format!(
                "injected failure writing {}",
                storage_key
            )));
        }
        self.inner.put(storage_key, data, content_type).await
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.get(storage_key).await
    }

    async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        self.inner.get_stream(storage_key).await
    }

    async fn get_range_stream(
        &self,
        storage_key: &str,
        start: u64,
        end: u64,
    ) -> StorageResult<ByteStream> {
        self.inner.get_range_stream(storage_key, start, end).await
    }

    async fn head(&self, storage_key: &str) -> StorageResult<ObjectMeta> {
        self.inner.head(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.inner.delete(storage_key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.inner.delete_prefix(prefix).await
    }

    async fn signed_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
        options: &SignedUrlOptions,
    ) -> StorageResult<String> {
        self.inner.signed_url(storage_key, expires_in, options).await
    }

    fn object_url(&self, storage_key: &str) -> String {
        self.inner.object_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
