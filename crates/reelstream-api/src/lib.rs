//! Reelstream API Library
//!
//! HTTP surface for movie ingestion and playback: handlers, error mapping,
//! the background ingest queue and application setup.

mod api_doc;
pub mod error;
pub mod handlers;
pub mod job_queue;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use job_queue::{IngestQueue, JobRegistry};
pub use state::AppState;
