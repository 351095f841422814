use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Genre assigned when a movie is submitted without one.
pub const DEFAULT_GENRE: &str = "Other";
/// Cast member recorded when a movie is submitted without a cast list.
pub const DEFAULT_CAST_MEMBER: &str = "Unknown";

/// One rendition playlist referenced by a movie record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HlsSegment {
    /// Quality label, e.g. `720p`
    pub quality: String,
    /// URL of the rendition playlist
    pub url: String,
}

/// Caller-supplied descriptive metadata, already normalized at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieMetadata {
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub release_year: i32,
    pub rating: f64,
    pub duration: i32,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub featured: bool,
}

/// Everything the catalog needs to create a record for a fully ingested video.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub metadata: MovieMetadata,
    pub thumbnail_key: String,
    pub thumbnail_url: String,
    pub trailer_key: String,
    pub trailer_url: String,
    pub video_key: String,
    pub video_url: String,
    pub hls_manifest_url: Option<String>,
    pub hls_segments: Vec<HlsSegment>,
}

/// Persisted catalog record binding a movie to its storage keys and renditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub rating: f64,
    pub release_year: i32,
    pub cast: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    pub duration: i32,
    pub featured: bool,
    pub thumbnail_key: String,
    pub thumbnail_url: String,
    pub trailer_key: String,
    pub trailer_url: String,
    pub video_key: String,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls_manifest_url: Option<String>,
    pub hls_segments: Vec<HlsSegment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Build the record for a freshly created catalog entry.
    pub fn from_new(id: Uuid, new: NewMovie, now: DateTime<Utc>) -> Self {
        let NewMovie {
            metadata,
            thumbnail_key,
            thumbnail_url,
            trailer_key,
            trailer_url,
            video_key,
            video_url,
            hls_manifest_url,
            hls_segments,
        } = new;

        Movie {
            id,
            title: metadata.title,
            description: metadata.description,
            genre: metadata.genre,
            rating: metadata.rating,
            release_year: metadata.release_year,
            cast: metadata.cast,
            director: metadata.director,
            duration: metadata.duration,
            featured: metadata.featured,
            thumbnail_key,
            thumbnail_url,
            trailer_key,
            trailer_url,
            video_key,
            video_url,
            hls_manifest_url,
            hls_segments,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the record carries a master manifest to hand to adaptive players.
    pub fn has_hls(&self) -> bool {
        self.hls_manifest_url
            .as_deref()
            .is_some_and(|url| !url.is_empty())
    }

    /// Every object key owned by this record that is not under the HLS prefix.
    pub fn owned_keys(&self) -> Vec<&str> {
        [
            self.video_key.as_str(),
            self.thumbnail_key.as_str(),
            self.trailer_key.as_str(),
        ]
        .into_iter()
        .filter(|key| !key.is_empty())
        .collect()
    }
}
