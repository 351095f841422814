//! Ingestion: form validation, metadata normalization and the end-to-end pipeline.

pub mod metadata;
pub mod pipeline;
pub mod request;

pub use metadata::{normalize_cast, normalize_genre, normalize_metadata, ListField, TextFields};
pub use pipeline::IngestionPipeline;
pub use request::{FormField, IngestRequest, SourceUpload, MISSING_FILES_MESSAGE};
