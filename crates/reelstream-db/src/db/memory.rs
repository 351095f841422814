use async_trait::async_trait;
use chrono::Utc;
use reelstream_core::models::{Movie, NewMovie};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::catalog::{CatalogResult, MovieCatalog};

/// Process-local catalog, used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryMovieCatalog {
    movies: Arc<RwLock<HashMap<Uuid, Movie>>>,
}

impl InMemoryMovieCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing ingestion.
    pub async fn insert(&self, movie: Movie) {
        self.movies.write().await.insert(movie.id, movie);
    }

    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

#[async_trait]
impl MovieCatalog for InMemoryMovieCatalog {
    async fn create(&self, movie: NewMovie) -> CatalogResult<Movie> {
        let movie = Movie::from_new(Uuid::new_v4(), movie, Utc::now());
        self.movies.write().await.insert(movie.id, movie.clone());
        tracing::debug!(movie_id = %movie.id, "Movie record stored in memory");
        Ok(movie)
    }

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Movie>> {
        Ok(self.movies.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Movie>> {
        Ok(self.movies.write().await.remove(&id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelstream_core::models::{HlsSegment, MovieMetadata, DEFAULT_GENRE};

    fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            metadata: MovieMetadata {
                title: title.to_string(),
                description: "desc".to_string(),
                genre: vec![DEFAULT_GENRE.to_string()],
                release_year: 2020,
                rating: 6.1,
                duration: 90,
                director: Some("A. Director".to_string()),
                cast: vec!["Lead".to_string()],
                featured: false,
            },
            thumbnail_key: "thumbnails/1-t.jpg".to_string(),
            thumbnail_url: "http://store/thumbnails/1-t.jpg".to_string(),
            trailer_key: "trailers/1-tr.mp4".to_string(),
            trailer_url: "http://store/trailers/1-tr.mp4".to_string(),
            video_key: "videos/1-v.mp4".to_string(),
            video_url: "http://store/videos/1-v.mp4".to_string(),
            hls_manifest_url: Some("http://store/videos/1-v.mp4/hls/master.m3u8".to_string()),
            hls_segments: vec![HlsSegment {
                quality: "240p".to_string(),
                url: "http://store/videos/1-v.mp4/hls/240p/playlist.m3u8".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let catalog = InMemoryMovieCatalog::new();
        let movie = catalog.create(new_movie("First")).await.unwrap();

        assert_eq!(movie.title, "First");
        assert_eq!(movie.created_at, movie.updated_at);
        assert_eq!(movie.hls_segments.len(), 1);
        assert_eq!(catalog.get(movie.id).await.unwrap(), Some(movie));
    }

    #[tokio::test]
    async fn test_distinct_ids_per_record() {
        let catalog = InMemoryMovieCatalog::new();
        let a = catalog.create(new_movie("A")).await.unwrap();
        let b = catalog.create(new_movie("B")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(catalog.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let catalog = InMemoryMovieCatalog::new();
        let movie = catalog.create(new_movie("Gone")).await.unwrap();

        let removed = catalog.delete(movie.id).await.unwrap();
        assert_eq!(removed.map(|m| m.id), Some(movie.id));
        assert!(catalog.get(movie.id).await.unwrap().is_none());
        assert!(catalog.delete(movie.id).await.unwrap().is_none());
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let catalog = InMemoryMovieCatalog::new();
        assert!(catalog.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[test]
    fn test_movie_serializes_camel_case() {
        let movie = Movie::from_new(Uuid::nil(), new_movie("Json"), Utc::now());
        let json = serde_json::to_value(&movie).unwrap();
        assert!(json.get("videoKey").is_some());
        assert!(json.get("hlsManifestUrl").is_some());
        assert_eq!(json["hlsSegments"][0]["quality"], "240p");
    }
}
