//! Shared key layout for every storage backend.
//!
//! - Uploads: `{videos|thumbnails|trailers}/{millis}-{file name}`
//! - Renditions: `{video_key}/hls/{height}p/{file}`
//! - Master manifest: `{video_key}/hls/master.m3u8`

use std::fmt::{Display, Formatter, Result as FmtResult};

pub const MASTER_MANIFEST_FILE: &str = "master.m3u8";

/// Namespace an uploaded file part is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Video,
    Thumbnail,
    Trailer,
}

impl UploadKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            UploadKind::Video => "videos",
            UploadKind::Thumbnail => "thumbnails",
            UploadKind::Trailer => "trailers",
        }
    }
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadKind::Video => write!(f, "video"),
            UploadKind::Thumbnail => write!(f, "thumbnail"),
            UploadKind::Trailer => write!(f, "trailer"),
        }
    }
}

/// Keep file names key- and URL-safe: anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Key for an uploaded file part, namespaced by kind and upload time.
pub fn upload_key(kind: UploadKind, file_name: &str, timestamp_millis: i64) -> String {
    format!(
        "{}/{}-{}",
        kind.prefix(),
        timestamp_millis,
        sanitize_file_name(file_name)
    )
}

/// Prefix holding every HLS artifact derived from `video_key`.
pub fn hls_prefix(video_key: &str) -> String {
    format!("{}/hls/", video_key)
}

pub fn rendition_key(video_key: &str, height: u32, file_name: &str) -> String {
    format!("{}/hls/{}p/{}", video_key, height, file_name)
}

pub fn master_manifest_key(video_key: &str) -> String {
    format!("{}/hls/{}", video_key, MASTER_MANIFEST_FILE)
}

/// Content type implied by a key's extension.
pub fn content_type_for_key(storage_key: &str) -> &'static str {
    let extension = storage_key
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("m3u8") => "application/vnd.apple.mpegurl",
        Some("ts") => "video/mp2t",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
