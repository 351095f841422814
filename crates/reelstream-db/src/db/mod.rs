//! Catalog repositories
//!
//! `catalog` holds the capability trait and its error type; `movie` the
//! PostgreSQL repository; `memory` the process-local implementation.
//
pub mod catalog;
pub mod memory;
pub mod movie;

pub use catalog::{CatalogError, CatalogResult, MovieCatalog};
pub use memory::InMemoryMovieCatalog;
pub use movie::PgMovieCatalog;
