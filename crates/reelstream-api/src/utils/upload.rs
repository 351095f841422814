//! Multipart form collection for ingestion requests.

use axum::extract::Multipart;
use axum::http::StatusCode;
use reelstream_core::AppError;
use reelstream_processing::{FormField, SourceUpload};

/// Drain a multipart body into typed form fields.
///
/// Parts with a file name are file parts; everything else is read as text.
/// No validation happens here beyond reading the body.
pub async fn collect_form_fields(mut multipart: Multipart) -> Result<Vec<FormField>, AppError> {
    let mut fields = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", e))
        }
    })? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                tracing::debug!(field = %name, file_name = %file_name, size_bytes = data.len(), "Received file part");
                fields.push(FormField::File {
                    name,
                    upload: SourceUpload::new(file_name, content_type, data),
                });
            }
            None => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read field '{}': {}", name, e))
                })?;
                fields.push(FormField::Text { name, value });
            }
        }
    }

    Ok(fields)
}
