pub mod job;
pub mod movie;
pub mod rendition;

pub use job::{IngestJob, JobStatus};
pub use movie::{
    HlsSegment, Movie, MovieMetadata, NewMovie, DEFAULT_CAST_MEMBER, DEFAULT_GENRE,
};
pub use rendition::{QualityProfile, RenditionResult, TranscodeResult, DEFAULT_QUALITY_PROFILES};
