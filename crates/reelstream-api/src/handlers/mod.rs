//! HTTP handlers for movie ingestion, playback and catalog access.

pub mod ingest_jobs;
pub mod movie_delete;
pub mod movie_get;
pub mod movie_hls;
pub mod movie_ingest;
pub mod movie_stream;
pub mod public_file;

use reelstream_core::models::Movie;
use reelstream_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

pub const MOVIE_NOT_FOUND: &str = "Movie not found";

/// Success envelope: `{ "success": true, "data": .. }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope for operations without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Fetch a movie by its path id. Ids that are not UUIDs cannot name a movie,
/// so they get the same 404 as unknown ones.
pub(crate) async fn load_movie(state: &AppState, id: &str) -> Result<Movie, HttpAppError> {
    let not_found = || HttpAppError(AppError::NotFound(MOVIE_NOT_FOUND.to_string()));
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    state.catalog.get(id).await?.ok_or_else(not_found)
}
