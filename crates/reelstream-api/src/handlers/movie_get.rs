use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_movie, ApiResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use reelstream_core::models::Movie;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie record", body = ApiResponse<Movie>),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let movie = load_movie(&state, &id).await?;
    Ok(Json(ApiResponse::new(movie)))
}
