//! Reelstream Core Library
//!
//! Domain models, error types and configuration shared by every reelstream crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{
    BaseConfig, Config, DatabaseConfig, ServiceConfig, StorageConfig, TranscodeConfig,
    TranscodeMode,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
