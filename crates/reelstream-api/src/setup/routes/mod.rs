//! Route configuration and setup

mod health;

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use reelstream_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let mut routes = movie_routes();
    if state.url_signer.is_some() {
        routes = routes.route("/files/{*key}", get(handlers::public_file::serve_file));
        tracing::info!("Serving local storage objects under /files");
    }

    let app = public_routes(state.clone())
        .merge(routes.with_state(state))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_video_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let exposed = [header::CONTENT_RANGE, header::CONTENT_LENGTH, header::CONTENT_TYPE];

    let cors = if config.cors_origins().iter().any(|origin| origin == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    };
    Ok(cors)
}

fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/movies", post(handlers::movie_ingest::ingest_movie))
        .route("/api/movies/jobs", post(handlers::ingest_jobs::submit_ingest_job))
        .route("/api/movies/jobs/{id}", get(handlers::ingest_jobs::get_ingest_job))
        .route(
            "/api/movies/{id}",
            get(handlers::movie_get::get_movie).delete(handlers::movie_delete::delete_movie),
        )
        .route("/api/movies/{id}/stream", get(handlers::movie_stream::stream_movie))
        .route(
            "/api/movies/{id}/signed-url",
            get(handlers::movie_stream::get_signed_url),
        )
        .route("/api/movies/{id}/hls", get(handlers::movie_hls::get_hls_manifest))
}

fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::openapi_spec()) }),
        )
}
