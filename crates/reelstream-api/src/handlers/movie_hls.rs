use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_movie, ApiResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use reelstream_core::models::HlsSegment;
use reelstream_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub const HLS_NOT_AVAILABLE: &str = "HLS manifest not available for this movie";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HlsManifestResponse {
    pub manifest_url: String,
    pub segments: Vec<HlsSegment>,
}

/// Master manifest URL plus one playlist URL per rendition, for adaptive players.
#[utoipa::path(
    get,
    path = "/api/movies/{id}/hls",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "HLS manifest", body = ApiResponse<HlsManifestResponse>),
        (status = 404, description = "Movie not found, or movie has no HLS manifest", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_hls_manifest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let movie = load_movie(&state, &id).await?;

    let manifest_url = match movie.hls_manifest_url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(AppError::NotFound(HLS_NOT_AVAILABLE.to_string()).into()),
    };

    Ok(Json(ApiResponse::new(HlsManifestResponse {
        manifest_url,
        segments: movie.hls_segments,
    })))
}
