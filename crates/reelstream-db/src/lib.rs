//! Reelstream Database Layer
//!
//! Persistence for catalog records: the [`MovieCatalog`] capability with a
//! PostgreSQL implementation and an in-memory one for development and tests.
//
// Module declarations
pub mod db;

// Re-exports: catalog capability and implementations
pub use db::{CatalogError, CatalogResult, InMemoryMovieCatalog, MovieCatalog, PgMovieCatalog};
