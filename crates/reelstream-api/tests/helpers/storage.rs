use async_trait::async_trait;
use bytes::Bytes;
use reelstream_storage::{
    ByteStream, LocalStorage, ObjectMeta, SignedUrlOptions, Storage, StorageBackend, StorageResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Local storage that counts writes and reads, so tests can assert a request
/// never reached the object store.
pub struct CountingStorage {
    inner: LocalStorage,
    puts: AtomicUsize,
    reads: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(storage_key, data, content_type).await
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(storage_key).await
    }

    async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_stream(storage_key).await
    }

    async fn get_range_stream(
        &self,
        storage_key: &str,
        start: u64,
        end: u64,
    ) -> StorageResult<ByteStream> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_range_stream(storage_key, start, end).await
    }

    async fn head(&self, storage_key: &str) -> StorageResult<ObjectMeta> {
        self.inner.head(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(storage_key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
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
