//! Video transcoding: encoder strategies, the transcoding engine and master manifests.

pub mod encoder;
pub mod engine;
pub mod fake;
pub mod ffmpeg;
pub mod manifest;
pub mod offline;
pub mod transcoder;
pub mod workspace;

pub use encoder::{Encoder, RenditionOutput, RENDITION_PLAYLIST};
pub use engine::TranscodingEngine;
pub use fake::FakeEncoder;
pub use ffmpeg::FfmpegEncoder;
pub use manifest::{bandwidth_for, build_master_playlist, resolution_for};
pub use offline::OfflineTranscoder;
pub use transcoder::{TranscodeJob, Transcoder};
pub use workspace::TranscodeWorkspace;
