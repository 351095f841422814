use reelstream_core::Config;
use reelstream_db::MovieCatalog;
use reelstream_processing::IngestionPipeline;
use reelstream_storage::{Storage, UrlSigner};
use std::sync::Arc;

use crate::job_queue::IngestQueue;

/// Shared handles every handler works with.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub pipeline: Arc<IngestionPipeline>,
    pub ingest_queue: IngestQueue,
    /// Verifies `/files` URLs; present only for the local storage backend.
    pub url_signer: Option<UrlSigner>,
}
