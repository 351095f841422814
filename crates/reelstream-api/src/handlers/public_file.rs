//! Local storage file route: serves objects by signed URL, with range support.
//!
//! HLS artifacts (keys under a `/hls/` segment) are served without a
//! signature because playlists reference their segments by relative URL.
//! Everything else needs the query parameters issued by the local backend's
//! `signed_url`.

use crate::error::HttpAppError;
use crate::handlers::movie_stream::stream_object;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap},
    response::Response,
};
use reelstream_core::AppError;
use reelstream_storage::keys::content_type_for_key;
use reelstream_storage::SignedParams;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct FileAccessQuery {
    pub expires: Option<u64>,
    pub disposition: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub signature: Option<String>,
}

fn is_hls_artifact(storage_key: &str) -> bool {
    storage_key.contains("/hls/")
}

fn forbidden(message: &str) -> HttpAppError {
    HttpAppError(AppError::Forbidden(message.to_string()))
}

#[tracing::instrument(skip(state, query, headers), fields(operation = "serve_file"))]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    query: Result<Query<FileAccessQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let signer = state
        .url_signer
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    let Query(query) = query?;

    let mut content_type = content_type_for_key(&key).to_string();
    let mut extra_headers = Vec::new();

    match query.signature {
        Some(signature) => {
            let params = SignedParams {
                expires: query
                    .expires
                    .ok_or_else(|| forbidden("Signed URL is missing its expiry"))?,
                disposition: query.disposition.unwrap_or_default(),
                content_type: query.content_type.unwrap_or_default(),
                signature,
            };
            signer.verify(&key, &params).map_err(|e| {
                tracing::debug!(key = %key, error = %e, "Rejected signed URL");
                forbidden("Invalid or expired signed URL")
            })?;

            if !params.content_type.is_empty() {
                content_type = params.content_type;
            }
            if !params.disposition.is_empty() {
                extra_headers.push((header::CONTENT_DISPOSITION, params.disposition));
            }
            extra_headers.push((header::CACHE_CONTROL, "private, max-age=3600".to_string()));
        }
        None if is_hls_artifact(&key) => {
            extra_headers.push((
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ));
        }
        None => return Err(forbidden("A signed URL is required for this object")),
    }

    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    stream_object(
        state.storage.as_ref(),
        &key,
        range,
        &content_type,
        &extra_headers,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hls_artifacts_are_recognized() {
        assert!(is_hls_artifact("videos/1-a.mp4/hls/master.m3u8"));
        assert!(is_hls_artifact("videos/1-a.mp4/hls/240p/segment_000.ts"));
        assert!(!is_hls_artifact("videos/1-a.mp4"));
        assert!(!is_hls_artifact("thumbnails/1-hls.jpg"));
    }
}
