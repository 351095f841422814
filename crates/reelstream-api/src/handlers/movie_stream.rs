//! Byte-range streaming and signed direct-access URLs.

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_movie, ApiResponse};
use crate::state::AppState;
use crate::utils::range::ByteRange;
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use reelstream_core::models::Movie;
use reelstream_core::AppError;
use reelstream_storage::{SignedUrlOptions, Storage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const NO_VIDEO_KEY: &str = "No S3 key found for this movie";
const VIDEO_CONTENT_TYPE: &str = "video/mp4";
/// Seven days, the longest presigned URL S3 accepts.
const MAX_SIGNED_URL_TTL_SECS: u64 = 604_800;

fn video_key(movie: &Movie) -> Result<&str, HttpAppError> {
    if movie.video_key.is_empty() {
        return Err(AppError::NotFound(NO_VIDEO_KEY.to_string()).into());
    }
    Ok(&movie.video_key)
}

/// Stream a stored object, honouring a `Range` header.
///
/// Without a usable range the whole object is sent with 200. A satisfiable
/// range is sent with 206; one outside the object gets 416.
pub(crate) async fn stream_object(
    storage: &dyn Storage,
    storage_key: &str,
    range_header: Option<&str>,
    content_type: &str,
    extra_headers: &[(header::HeaderName, String)],
) -> Result<Response, HttpAppError> {
    let size = storage.head(storage_key).await?.size;

    let (status, stream, content_length, content_range) =
        match ByteRange::resolve(range_header, size) {
            ByteRange::Full => (
                StatusCode::OK,
                storage.get_stream(storage_key).await?,
                size,
                None,
            ),
            ByteRange::Partial { start, end } => (
                StatusCode::PARTIAL_CONTENT,
                storage.get_range_stream(storage_key, start, end).await?,
                end - start + 1,
                Some(ByteRange::content_range(start, end, size)),
            ),
            ByteRange::Unsatisfiable => {
                tracing::debug!(key = %storage_key, range = ?range_header, size, "Unsatisfiable range");
                let mut response = HttpAppError(AppError::RangeNotSatisfiable { size }).into_response();
                if let Ok(value) = HeaderValue::from_str(&ByteRange::unsatisfied_content_range(size)) {
                    response.headers_mut().insert(header::CONTENT_RANGE, value);
                }
                return Ok(response);
            }
        };

    let key = storage_key.to_string();
    let body_stream = stream.map(move |result| {
        result.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Storage stream failed mid-transfer");
            std::io::Error::other(format!("Storage stream error: {}", e))
        })
    });

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ACCEPT_RANGES, "bytes");
    if let Some(content_range) = content_range {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }
    for (name, value) in extra_headers {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

/// Stream the original video, with HTTP range support for seeking.
#[utoipa::path(
    get,
    path = "/api/movies/{id}/stream",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie ID"),
        ("Range" = Option<String>, Header, description = "Byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Full video", content_type = "video/mp4"),
        (status = 206, description = "Requested byte range", content_type = "video/mp4"),
        (status = 404, description = "Movie or video object not found", body = ErrorResponse),
        (status = 416, description = "Range outside the video", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn stream_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let movie = load_movie(&state, &id).await?;
    let key = video_key(&movie)?;
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    stream_object(state.storage.as_ref(), key, range, VIDEO_CONTENT_TYPE, &[]).await
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SignedUrlQuery {
    /// URL lifetime in seconds (1..=604800)
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
    pub expires_in: u64,
}

/// Time-limited URL for playing the original video straight from storage.
#[utoipa::path(
    get,
    path = "/api/movies/{id}/signed-url",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie ID"),
        SignedUrlQuery
    ),
    responses(
        (status = 200, description = "Signed URL", body = ApiResponse<SignedUrlResponse>),
        (status = 400, description = "Invalid expiresIn", body = ErrorResponse),
        (status = 404, description = "Movie or video key not found", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query))]
pub async fn get_signed_url(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<SignedUrlQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let expires_in = query
        .expires_in
        .unwrap_or_else(|| state.config.signed_url_ttl_secs());
    if !(1..=MAX_SIGNED_URL_TTL_SECS).contains(&expires_in) {
        return Err(AppError::InvalidInput(format!(
            "expiresIn must be between 1 and {} seconds",
            MAX_SIGNED_URL_TTL_SECS
        ))
        .into());
    }

    let movie = load_movie(&state, &id).await?;
    let key = video_key(&movie)?;

    let signed_url = state
        .storage
        .signed_url(
            key,
            Duration::from_secs(expires_in),
            &SignedUrlOptions::inline_video(),
        )
        .await?;

    tracing::debug!(movie_id = %movie.id, expires_in, "Issued signed URL");

    Ok(Json(ApiResponse::new(SignedUrlResponse {
        signed_url,
        expires_in,
    })))
}
