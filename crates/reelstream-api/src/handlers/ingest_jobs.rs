//! Background ingestion: enqueue a validated request and poll its job record.

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ApiResponse;
use crate::state::AppState;
use crate::utils::upload::collect_form_fields;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reelstream_core::models::IngestJob;
use reelstream_core::AppError;
use reelstream_processing::IngestRequest;
use std::sync::Arc;
use uuid::Uuid;

const JOB_NOT_FOUND: &str = "Job not found";

#[utoipa::path(
    post,
    path = "/api/movies/jobs",
    tag = "movies",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 202, description = "Ingestion queued", body = ApiResponse<IngestJob>),
        (status = 400, description = "Missing file parts or invalid metadata", body = ErrorResponse),
        (status = 503, description = "Ingest queue is full", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn submit_ingest_job(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let fields = collect_form_fields(multipart).await?;
    let request = IngestRequest::from_fields(fields)?;

    let job = state.ingest_queue.submit(request).await?;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::new(job))))
}

#[utoipa::path(
    get,
    path = "/api/movies/jobs/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Ingest job ID")
    ),
    responses(
        (status = 200, description = "Job record", body = ApiResponse<IngestJob>),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
pub async fn get_ingest_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let not_found = || HttpAppError(AppError::NotFound(JOB_NOT_FOUND.to_string()));
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    let job = state
        .ingest_queue
        .jobs()
        .get(id)
        .await
        .ok_or_else(not_found)?;

    Ok(Json(ApiResponse::new(job)))
}
