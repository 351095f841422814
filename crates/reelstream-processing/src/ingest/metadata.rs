//! Normalization of client-submitted metadata fields into [`MovieMetadata`].
//!
//! Clients send list-valued fields in more than one shape; each shape is
//! parsed into a [`ListField`] before it reaches the pipeline, and anything
//! that is neither shape is rejected.

use reelstream_core::models::{MovieMetadata, DEFAULT_CAST_MEMBER, DEFAULT_GENRE};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::IngestError;

/// Shapes accepted for list-valued text fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    /// JSON array of strings: `["Drama","Thriller"]`
    Many(Vec<String>),
    /// A bare string; its meaning depends on the field.
    One(String),
}

impl ListField {
    /// Parse raw form text. Text that is not JSON at all is a bare string;
    /// JSON of any other shape (numbers, objects, mixed arrays) is rejected.
    pub fn parse(field: &str, raw: &str) -> Result<Self, IngestError> {
        let trimmed = raw.trim();
        let looks_like_json = trimmed.starts_with('[') || trimmed.starts_with('"');
        match serde_json::from_str::<ListField>(trimmed) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !looks_like_json && serde_json::from_str::<serde_json::Value>(trimmed).is_err() => {
                Ok(ListField::One(trimmed.to_string()))
            }
            Err(_) => Err(IngestError::validation(format!(
                "{} must be a string or a JSON array of strings",
                field
            ))),
        }
    }

    fn into_items(self, split_commas: bool) -> Vec<String> {
        let items = match self {
            ListField::Many(items) => items,
            ListField::One(value) if split_commas => {
                value.split(',').map(str::to_string).collect()
            }
            ListField::One(value) => vec![value],
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Text fields of a form by name, in submission order. A name sent more than
/// once keeps every value.
pub type TextFields = HashMap<String, Vec<String>>;

/// Last submitted value of a scalar field.
fn scalar<'a>(fields: &'a TextFields, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(|values| values.last()).map(String::as_str)
}

/// A list field as submitted: a single value is parsed for its shape,
/// repeated values are the list itself.
fn list_field(fields: &TextFields, name: &str) -> Result<Option<ListField>, IngestError> {
    match fields.get(name).map(Vec::as_slice) {
        None | Some([]) => Ok(None),
        Some([single]) if single.trim().is_empty() => Ok(None),
        Some([single]) => ListField::parse(name, single).map(Some),
        Some(many) => Ok(Some(ListField::Many(many.to_vec()))),
    }
}

fn or_default(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}

fn parse_raw(field: &str, raw: Option<&str>) -> Result<Option<ListField>, IngestError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => ListField::parse(field, raw).map(Some),
        _ => Ok(None),
    }
}

fn genre_items(field: Option<ListField>) -> Vec<String> {
    let items = field.map(|f| f.into_items(false)).unwrap_or_default();
    or_default(items, DEFAULT_GENRE)
}

fn cast_items(field: Option<ListField>) -> Vec<String> {
    let items = field.map(|f| f.into_items(true)).unwrap_or_default();
    or_default(items, DEFAULT_CAST_MEMBER)
}

/// Genre list; missing or empty input becomes the default genre.
pub fn normalize_genre(raw: Option<&str>) -> Result<Vec<String>, IngestError> {
    Ok(genre_items(parse_raw("genre", raw)?))
}

/// Cast list; a bare string is comma-separated. Missing input becomes the default member.
pub fn normalize_cast(raw: Option<&str>) -> Result<Vec<String>, IngestError> {
    Ok(cast_items(parse_raw("cast", raw)?))
}

fn required_text(fields: &TextFields, name: &str) -> Result<String, IngestError> {
    scalar(fields, name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| IngestError::validation(format!("{} is required", name)))
}

fn required_number<T: FromStr>(fields: &TextFields, name: &str) -> Result<T, IngestError> {
    let raw = required_text(fields, name)?;
    raw.parse::<T>()
        .map_err(|_| IngestError::validation(format!("{} must be a number, got '{}'", name, raw)))
}

fn parse_featured(raw: Option<&str>) -> Result<bool, IngestError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(IngestError::validation(format!(
            "featured must be 'true' or 'false', got '{}'",
            other
        ))),
    }
}

/// Build strongly typed metadata from the text fields of an ingestion form.
///
/// Unknown field names are ignored. Scalar fields sent more than once take
/// their last value; `genre` and `cast` sent more than once take every value.
pub fn normalize_metadata(fields: &TextFields) -> Result<MovieMetadata, IngestError> {
    let rating: f64 = required_number(fields, "rating")?;
    if !rating.is_finite() {
        return Err(IngestError::validation("rating must be a finite number"));
    }

    Ok(MovieMetadata {
        title: required_text(fields, "title")?,
        description: required_text(fields, "description")?,
        genre: genre_items(list_field(fields, "genre")?),
        release_year: required_number(fields, "releaseYear")?,
        rating,
        duration: required_number(fields, "duration")?,
        director: scalar(fields, "director")
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        cast: cast_items(list_field(fields, "cast")?),
        featured: parse_featured(scalar(fields, "featured"))?,
    })
}
