use axum_test::multipart::{MultipartForm, Part};
use reelstream_core::models::MovieMetadata;

/// Deterministic fake video body of `len` bytes.
pub fn video_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub fn metadata(title: &str) -> MovieMetadata {
    MovieMetadata {
        title: title.to_string(),
        description: "Integration test movie".to_string(),
        genre: vec!["Drama".to_string()],
        release_year: 2019,
        rating: 7.1,
        duration: 95,
        director: None,
        cast: vec!["Unknown".to_string()],
        featured: false,
    }
}

/// Multipart form with valid metadata and no file parts.
pub fn metadata_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "Harbour Lights")
        .add_text("description", "A slow night at the docks")
        .add_text("genre", r#"["Drama","Mystery"]"#)
        .add_text("releaseYear", "2018")
        .add_text("rating", "7.4")
        .add_text("duration", "112")
        .add_text("director", "A. Director")
        .add_text("cast", "Lead One, Lead Two")
        .add_text("featured", "true")
}

pub fn file_part(file_name: &str, mime_type: &str, data: Vec<u8>) -> Part {
    Part::bytes(data).file_name(file_name).mime_type(mime_type)
}

/// Complete ingestion form: metadata plus video, thumbnail and trailer.
pub fn ingest_form(video: Vec<u8>) -> MultipartForm {
    with_files(metadata_form(), "harbour.mp4", video)
}

/// Add the three file parts to `form`, naming the video `video_name`.
pub fn with_files(form: MultipartForm, video_name: &str, video: Vec<u8>) -> MultipartForm {
    form.add_part("video", file_part(video_name, "video/mp4", video))
        .add_part(
            "thumbnail",
            file_part("poster.jpg", "image/jpeg", b"\xFF\xD8\xFFposter".to_vec()),
        )
        .add_part(
            "trailer",
            file_part("trailer.mp4", "video/mp4", b"trailer-bytes".to_vec()),
        )
}
