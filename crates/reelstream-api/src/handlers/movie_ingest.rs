use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ApiResponse;
use crate::state::AppState;
use crate::utils::upload::collect_form_fields;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reelstream_core::models::Movie;
use reelstream_processing::IngestRequest;
use std::sync::Arc;

/// Ingest a movie synchronously: upload its parts, transcode the video to HLS
/// and create the catalog record.
///
/// Form parts `video`, `thumbnail` and `trailer` are required; metadata comes
/// from the text fields (`title`, `description`, `genre`, `releaseYear`,
/// `rating`, `duration`, `director`, `cast`, `featured`).
#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "movies",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Movie ingested", body = ApiResponse<Movie>),
        (status = 400, description = "Missing file parts or invalid metadata", body = ErrorResponse),
        (status = 413, description = "Request too large", body = ErrorResponse),
        (status = 500, description = "Storage, transcode or catalog failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn ingest_movie(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let fields = collect_form_fields(multipart).await?;
    let request = IngestRequest::from_fields(fields)?;

    let movie = state.pipeline.ingest(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(movie))))
}
