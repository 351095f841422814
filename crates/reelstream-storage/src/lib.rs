//! Reelstream Storage Library
//!
//! The object storage capability the ingestion pipeline and streaming handlers
//! depend on: the [`Storage`] trait plus S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! - Uploaded parts: `{videos|thumbnails|trailers}/{millis}-{file name}`
//! - HLS artifacts: `{video_key}/hls/{height}p/{file}` and `{video_key}/hls/master.m3u8`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the [`keys`] module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use factory::create_local_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reelstream_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signing::{SignedParams, UrlSigner};
pub use traits::{ByteStream, ObjectMeta, SignedUrlOptions, Storage, StorageError, StorageResult};
