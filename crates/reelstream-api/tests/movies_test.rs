//! Ingestion, lookup and deletion integration tests.
//!
//! Run with: `cargo test -p reelstream-api --test movies_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::fixtures::{file_part, ingest_form, metadata_form, video_bytes, with_files};
use helpers::{setup_test_app, split_files_url};
use reelstream_storage::keys::master_manifest_key;
use reelstream_storage::Storage;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn test_ingest_movie_publishes_all_renditions() {
    let app = setup_test_app().await;
    let video = video_bytes(2048);

    let response = app
        .client()
        .post("/api/movies")
        .multipart(ingest_form(video.clone()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    let movie = &json["data"];
    assert_eq!(movie["title"], "Harbour Lights");
    assert_eq!(movie["genre"], serde_json::json!(["Drama", "Mystery"]));
    assert_eq!(movie["cast"], serde_json::json!(["Lead One", "Lead Two"]));
    assert_eq!(movie["featured"], true);
    assert_eq!(movie["releaseYear"], 2018);

    let qualities: Vec<&str> = movie["hlsSegments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["quality"].as_str().unwrap())
        .collect();
    assert_eq!(qualities, vec!["240p", "360p", "480p", "720p"]);
    assert_eq!(app.encoder.calls(), 4);

    let video_key = movie["videoKey"].as_str().unwrap();
    assert!(video_key.starts_with("videos/"));
    assert!(video_key.ends_with("-harbour.mp4"));
    assert!(movie["thumbnailKey"].as_str().unwrap().starts_with("thumbnails/"));
    assert!(movie["trailerKey"].as_str().unwrap().starts_with("trailers/"));
    assert_eq!(app.storage.get(video_key).await.unwrap(), video);

    let manifest_url = movie["hlsManifestUrl"].as_str().unwrap();
    assert!(manifest_url.ends_with("/hls/master.m3u8"));
    let (manifest_path, _) = split_files_url(manifest_url);
    let manifest = app.client().get(&manifest_path).await;
    assert_eq!(manifest.status_code(), StatusCode::OK);
    let manifest = manifest.text();
    assert!(manifest.starts_with("#EXTM3U"));
    assert!(manifest.contains("240p/playlist.m3u8"));
}

#[tokio::test]
async fn test_ingest_repeated_genre_fields_keep_every_value() {
    let app = setup_test_app().await;
    let form = MultipartForm::new()
        .add_text("title", "Harbour Lights")
        .add_text("description", "A slow night at the docks")
        .add_text("genre", "Drama")
        .add_text("genre", "Thriller")
        .add_text("releaseYear", "2018")
        .add_text("rating", "7.4")
        .add_text("duration", "112")
        .add_text("cast", "Lead One")
        .add_text("cast", "Lead Two");

    let response = app
        .client()
        .post("/api/movies")
        .multipart(with_files(form, "harbour.mp4", video_bytes(256)))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["data"]["genre"], serde_json::json!(["Drama", "Thriller"]));
    assert_eq!(json["data"]["cast"], serde_json::json!(["Lead One", "Lead Two"]));
}

#[tokio::test]
async fn test_ingest_video_named_like_store_suffix() {
    let app = setup_test_app().await;
    let video = video_bytes(512);

    let response = app
        .client()
        .post("/api/movies")
        .multipart(with_files(metadata_form(), "scene.obj", video.clone()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let json: Value = response.json();
    let video_key = json["data"]["videoKey"].as_str().unwrap();
    assert!(video_key.ends_with("-scene.obj"));
    assert_eq!(json["data"]["hlsSegments"].as_array().unwrap().len(), 4);
    assert_eq!(app.storage.get(video_key).await.unwrap(), video);
    assert!(app.storage.exists(&master_manifest_key(video_key)).await.unwrap());
}

#[tokio::test]
async fn test_ingest_missing_trailer_touches_nothing() {
    let app = setup_test_app().await;
    let form = metadata_form()
        .add_part("video", file_part("movie.mp4", "video/mp4", video_bytes(64)))
        .add_part(
            "thumbnail",
            file_part("poster.png", "image/png", b"png".to_vec()),
        );

    let response = app.client().post("/api/movies").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "Thumbnail, video, and trailer files are required"
    );
    assert_eq!(app.storage.puts(), 0);
    assert_eq!(app.encoder.calls(), 0);
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn test_ingest_invalid_metadata_is_rejected() {
    let app = setup_test_app().await;
    let form = ingest_form(video_bytes(64)).add_text("rating", "excellent");

    let response = app.client().post("/api/movies").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["message"].as_str().unwrap().contains("rating"));
    assert_eq!(app.storage.puts(), 0);
    assert!(app.catalog.is_empty().await);
}

#[tokio::test]
async fn test_get_movie() {
    let app = setup_test_app().await;
    let movie = app.seed_movie(&video_bytes(32), true).await;

    let response = app
        .client()
        .get(&format!("/api/movies/{}", movie.id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["data"]["id"], movie.id.to_string());
    assert_eq!(json["data"]["videoKey"], movie.video_key);

    let response = app
        .client()
        .get(&format!("/api/movies/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["message"], "Movie not found");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_movie_removes_record_and_objects() {
    let app = setup_test_app().await;
    let created: Value = app
        .client()
        .post("/api/movies")
        .multipart(ingest_form(video_bytes(512)))
        .await
        .json();
    let movie = &created["data"];
    let id = movie["id"].as_str().unwrap();
    let video_key = movie["videoKey"].as_str().unwrap();
    let thumbnail_key = movie["thumbnailKey"].as_str().unwrap();
    assert!(app.storage.exists(&master_manifest_key(video_key)).await.unwrap());

    let response = app.client().delete(&format!("/api/movies/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Movie deleted");

    let response = app.client().get(&format!("/api/movies/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    assert!(!app.storage.exists(video_key).await.unwrap());
    assert!(!app.storage.exists(thumbnail_key).await.unwrap());
    assert!(!app.storage.exists(&master_manifest_key(video_key)).await.unwrap());

    let response = app.client().delete(&format!("/api/movies/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
