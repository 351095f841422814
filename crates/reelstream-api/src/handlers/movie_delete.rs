use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{MessageResponse, MOVIE_NOT_FOUND};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use reelstream_core::models::Movie;
use reelstream_core::AppError;
use reelstream_storage::keys::hls_prefix;
use reelstream_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

/// Delete every stored object a removed record owned. Failures are logged;
/// the record stays deleted.
async fn delete_objects(storage: &dyn Storage, movie: &Movie) {
    if !movie.video_key.is_empty() {
        let prefix = hls_prefix(&movie.video_key);
        match storage.delete_prefix(&prefix).await {
            Ok(deleted) => {
                tracing::debug!(movie_id = %movie.id, prefix = %prefix, deleted, "Deleted HLS artifacts")
            }
            Err(e) => {
                tracing::warn!(movie_id = %movie.id, prefix = %prefix, error = %e, "Failed to delete HLS artifacts")
            }
        }
    }

    for key in movie.owned_keys() {
        if let Err(e) = storage.delete(key).await {
            tracing::warn!(movie_id = %movie.id, key = %key, error = %e, "Failed to delete object");
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie and its stored objects deleted", body = MessageResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse),
        (status = 500, description = "Catalog failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let not_found = || HttpAppError(AppError::NotFound(MOVIE_NOT_FOUND.to_string()));
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    let movie = state.catalog.delete(id).await?.ok_or_else(not_found)?;
    delete_objects(state.storage.as_ref(), &movie).await;

    tracing::info!(movie_id = %movie.id, "Movie deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Movie deleted".to_string(),
    }))
}
