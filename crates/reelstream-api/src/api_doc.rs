//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reelstream_core::models;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelstream API",
        version = "0.1.0",
        description = "Movie ingestion with HLS adaptive-bitrate transcoding, byte-range streaming and signed playback URLs."
    ),
    paths(
        handlers::movie_ingest::ingest_movie,
        handlers::ingest_jobs::submit_ingest_job,
        handlers::ingest_jobs::get_ingest_job,
        handlers::movie_get::get_movie,
        handlers::movie_delete::delete_movie,
        handlers::movie_stream::stream_movie,
        handlers::movie_stream::get_signed_url,
        handlers::movie_hls::get_hls_manifest,
    ),
    components(
        schemas(
            models::Movie,
            models::HlsSegment,
            models::IngestJob,
            models::JobStatus,
            handlers::MessageResponse,
            handlers::movie_hls::HlsManifestResponse,
            handlers::movie_stream::SignedUrlResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "movies", description = "Movie ingestion, catalog access and playback")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_movie_routes() {
        let spec = openapi_spec();
        for path in [
            "/api/movies",
            "/api/movies/jobs",
            "/api/movies/jobs/{id}",
            "/api/movies/{id}",
            "/api/movies/{id}/stream",
            "/api/movies/{id}/signed-url",
            "/api/movies/{id}/hls",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
