use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelstream_core::models::{HlsSegment, Movie, NewMovie};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::catalog::{CatalogResult, MovieCatalog};

const MOVIE_COLUMNS: &str = r#"id, title, description, genre, rating, release_year, "cast", director,
    duration, featured, thumbnail_key, thumbnail_url, trailer_key, trailer_url, video_key,
    video_url, hls_manifest_url, hls_segments, created_at, updated_at"#;

#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    description: String,
    genre: Vec<String>,
    rating: f64,
    release_year: i32,
    cast: Vec<String>,
    director: Option<String>,
    duration: i32,
    featured: bool,
    thumbnail_key: String,
    thumbnail_url: String,
    trailer_key: String,
    trailer_url: String,
    video_key: String,
    video_url: String,
    hls_manifest_url: Option<String>,
    hls_segments: Json<Vec<HlsSegment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            description: row.description,
            genre: row.genre,
            rating: row.rating,
            release_year: row.release_year,
            cast: row.cast,
            director: row.director,
            duration: row.duration,
            featured: row.featured,
            thumbnail_key: row.thumbnail_key,
            thumbnail_url: row.thumbnail_url,
            trailer_key: row.trailer_key,
            trailer_url: row.trailer_url,
            video_key: row.video_key,
            video_url: row.video_url,
            hls_manifest_url: row.hls_manifest_url,
            hls_segments: row.hls_segments.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for movie catalog records
#[derive(Clone)]
pub struct PgMovieCatalog {
    pool: PgPool,
}

impl PgMovieCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieCatalog for PgMovieCatalog {
    #[tracing::instrument(skip(self, movie), fields(db.table = "movies", db.operation = "insert"))]
    async fn create(&self, movie: NewMovie) -> CatalogResult<Movie> {
        let id = Uuid::new_v4();
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
        } = movie;

        let row = sqlx::query_as::<Postgres, MovieRow>(&format!(
            r#"
            INSERT INTO movies (id, title, description, genre, rating, release_year, "cast",
                director, duration, featured, thumbnail_key, thumbnail_url, trailer_key,
                trailer_url, video_key, video_url, hls_manifest_url, hls_segments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        ))
        .bind(id)
        .bind(&metadata.title)
        .bind(&metadata.description)
        .bind(&metadata.genre)
        .bind(metadata.rating)
        .bind(metadata.release_year)
        .bind(&metadata.cast)
        .bind(&metadata.director)
        .bind(metadata.duration)
        .bind(metadata.featured)
        .bind(&thumbnail_key)
        .bind(&thumbnail_url)
        .bind(&trailer_key)
        .bind(&trailer_url)
        .bind(&video_key)
        .bind(&video_url)
        .bind(&hls_manifest_url)
        .bind(Json(&hls_segments))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(movie_id = %row.id, video_key = %row.video_key, "Movie record created");
        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "movies", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> CatalogResult<Option<Movie>> {
        let row = sqlx::query_as::<Postgres, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE id = $1",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Movie::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "movies", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> CatalogResult<Option<Movie>> {
        let row = sqlx::query_as::<Postgres, MovieRow>(&format!(
            "DELETE FROM movies WHERE id = $1 RETURNING {}",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Movie::from))
    }

    async fn ping(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
