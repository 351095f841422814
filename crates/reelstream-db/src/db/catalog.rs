use async_trait::async_trait;
use reelstream_core::models::{Movie, NewMovie};
use reelstream_core::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog backend error: {0}")]
    Backend(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::Database(e),
            CatalogError::Backend(message) => AppError::Internal(message),
        }
    }
}

/// Persistence for catalog records written by the ingestion pipeline.
///
/// Records are created once and never updated by this subsystem; deleting
/// returns the removed record so callers can cascade storage cleanup.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn create(&self, movie: NewMovie) -> CatalogResult<Movie>;

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Movie>>;

    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Movie>>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }

    /// Short backend name reported by health checks.
    fn backend_name(&self) -> &'static str;
}
