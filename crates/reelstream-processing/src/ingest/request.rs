//! Typed view of an ingestion form.

use bytes::Bytes;
use reelstream_core::models::MovieMetadata;
use reelstream_storage::keys::content_type_for_key;
use super::metadata::{normalize_metadata, TextFields};
use crate::error::IngestError;

pub const MISSING_FILES_MESSAGE: &str = "Thumbnail, video, and trailer files are required";

/// One submitted file part, owned by the pipeline until it is uploaded or staged.
#[derive(Debug, Clone)]
pub struct SourceUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SourceUpload {
    /// Build an upload, guessing the MIME type from the file name when the client sent none.
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        let file_name = file_name.into();
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| content_type_for_key(&file_name).to_string());
        Self {
            file_name,
            content_type,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A multipart field as received at the HTTP boundary.
#[derive(Debug, Clone)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, upload: SourceUpload },
}

/// A validated ingestion request: all three file parts plus normalized metadata.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub video: SourceUpload,
    pub thumbnail: SourceUpload,
    pub trailer: SourceUpload,
    pub metadata: MovieMetadata,
}

impl IngestRequest {
    /// Validate form fields without side effects.
    ///
    /// Missing file parts are reported before metadata problems.
    pub fn from_fields(fields: Vec<FormField>) -> Result<Self, IngestError> {
        let mut text = TextFields::new();
        let (mut video, mut thumbnail, mut trailer) = (None, None, None);

        for field in fields {
            match field {
                FormField::Text { name, value } => {
                    text.entry(name).or_default().push(value);
                }
                FormField::File { name, upload } => match name.as_str() {
                    "video" => video = Some(upload),
                    "thumbnail" => thumbnail = Some(upload),
                    "trailer" => trailer = Some(upload),
                    other => tracing::debug!(field = %other, "Ignoring unexpected file part"),
                },
            }
        }

        let (Some(video), Some(thumbnail), Some(trailer)) = (video, thumbnail, trailer) else {
            return Err(IngestError::validation(MISSING_FILES_MESSAGE));
        };

        for (label, upload) in [("video", &video), ("thumbnail", &thumbnail), ("trailer", &trailer)] {
            if upload.data.is_empty() {
                return Err(IngestError::validation(format!("{} file is empty", label)));
            }
        }

        Ok(Self {
            metadata: normalize_metadata(&text)?,
            video,
            thumbnail,
            trailer,
        })
    }
}
