//! Storage setup and initialization

use anyhow::{Context, Result};
use reelstream_core::{Config, StorageBackend};
use reelstream_storage::{create_local_storage, create_storage, Storage, UrlSigner};
use std::sync::Arc;

/// Build the configured storage backend.
///
/// For the local backend the URL signer is returned as well, so the `/files`
/// route can verify the URLs the backend hands out.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Option<UrlSigner>)> {
    tracing::info!("Initializing storage...");

    let (storage, signer): (Arc<dyn Storage>, Option<UrlSigner>) = match config.storage_backend() {
        StorageBackend::Local => {
            let local = create_local_storage(config)
                .await
                .context("Failed to initialize local storage")?;
            let signer = local.signer().clone();
            (Arc::new(local), Some(signer))
        }
        StorageBackend::S3 => (
            create_storage(config)
                .await
                .context("Failed to initialize S3 storage")?,
            None,
        ),
    };

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage initialized successfully"
    );

    Ok((storage, signer))
}
