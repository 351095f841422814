//! FFmpeg-backed encoder.

use async_trait::async_trait;
use reelstream_core::models::QualityProfile;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::encoder::{collect_segments, Encoder, RenditionOutput, RENDITION_PLAYLIST};
use crate::error::TranscodeError;

const AUDIO_BITRATE: &str = "128k";
const AUDIO_SAMPLE_RATE: &str = "44100";
const AUDIO_CHANNELS: &str = "2";
/// Keep at most this many bytes of ffmpeg stderr in error messages.
const STDERR_TAIL: usize = 2048;

/// Encodes renditions by running one ffmpeg process per quality profile.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: String,
    segment_duration: u64,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: impl Into<String>, segment_duration: u64) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            segment_duration,
        }
    }

    /// Arguments for one rendition: H.264 baseline scaled to the profile height
    /// at constant bitrate, AAC stereo audio, fixed-length HLS segments.
    pub fn build_args(&self, input: &Path, output_dir: &Path, profile: &QualityProfile) -> Vec<String> {
        let bitrate = profile.bitrate();
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-profile:v".to_string(),
            "baseline".to_string(),
            "-level".to_string(),
            "3.0".to_string(),
            "-start_number".to_string(),
            "0".to_string(),
            "-hls_time".to_string(),
            self.segment_duration.to_string(),
            "-hls_list_size".to_string(),
            "0".to_string(),
            "-f".to_string(),
            "hls".to_string(),
            "-hls_segment_filename".to_string(),
            output_dir
                .join("segment_%03d.ts")
                .to_string_lossy()
                .to_string(),
            "-vf".to_string(),
            format!("scale=-2:{}", profile.height),
            "-b:v".to_string(),
            bitrate.clone(),
            "-maxrate".to_string(),
            bitrate.clone(),
            "-bufsize".to_string(),
            bitrate,
            "-b:a".to_string(),
            AUDIO_BITRATE.to_string(),
            "-ar".to_string(),
            AUDIO_SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            AUDIO_CHANNELS.to_string(),
            output_dir
                .join(RENDITION_PLAYLIST)
                .to_string_lossy()
                .to_string(),
        ]
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let start = trimmed.len().saturating_sub(STDERR_TAIL);
    let start = (start..trimmed.len())
        .find(|i| trimmed.is_char_boundary(*i))
        .unwrap_or(trimmed.len());
    trimmed[start..].to_string()
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    #[tracing::instrument(skip(self, input, output_dir), fields(quality = %profile.label()))]
    async fn encode_rendition(
        &self,
        input: &Path,
        output_dir: &Path,
        profile: &QualityProfile,
    ) -> Result<RenditionOutput, TranscodeError> {
        let args = self.build_args(input, output_dir, profile);
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    TranscodeError::EncoderUnavailable(format!("{}: {}", self.ffmpeg_path, e))
                }
                _ => TranscodeError::EncodeFailed {
                    quality: profile.label(),
                    message: format!("Failed to execute ffmpeg: {}", e),
                },
            })?;

        if !output.status.success() {
            let message = stderr_tail(&output.stderr);
            tracing::error!(
                quality = %profile.label(),
                status = %output.status,
                stderr = %message,
                "FFmpeg rendition failed"
            );
            return Err(TranscodeError::EncodeFailed {
                quality: profile.label(),
                message: format!("ffmpeg exited with {}: {}", output.status, message),
            });
        }

        let playlist_path = output_dir.join(RENDITION_PLAYLIST);
        if !tokio::fs::try_exists(&playlist_path).await? {
            return Err(TranscodeError::EncodeFailed {
                quality: profile.label(),
                message: "ffmpeg did not write a playlist".to_string(),
            });
        }
        let segment_paths = collect_segments(output_dir).await?;

        tracing::info!(
            quality = %profile.label(),
            segments = segment_paths.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "FFmpeg rendition complete"
        );

        Ok(RenditionOutput {
            playlist_path,
            segment_paths,
        })
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn arg_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let index = args.iter().position(|a| a == flag).unwrap();
        &args[index + 1]
    }

    #[test]
    fn test_args_constrain_bitrate_and_scale() {
        let encoder = FfmpegEncoder::new("ffmpeg", 10);
        let args = encoder.build_args(
            &PathBuf::from("/tmp/job/input.mp4"),
            &PathBuf::from("/tmp/job/out/480p"),
            &QualityProfile::new(480, 1400),
        );

        assert_eq!(arg_after(&args, "-i"), "/tmp/job/input.mp4");
        assert_eq!(arg_after(&args, "-vf"), "scale=-2:480");
        assert_eq!(arg_after(&args, "-b:v"), "1400k");
        assert_eq!(arg_after(&args, "-maxrate"), "1400k");
        assert_eq!(arg_after(&args, "-bufsize"), "1400k");
        assert_eq!(arg_after(&args, "-hls_time"), "10");
        assert_eq!(arg_after(&args, "-profile:v"), "baseline");
        assert_eq!(
            arg_after(&args, "-hls_segment_filename"),
            "/tmp/job/out/480p/segment_%03d.ts"
        );
        assert_eq!(args.last().unwrap(), "/tmp/job/out/480p/playlist.m3u8");
    }

    #[test]
    fn test_audio_is_normalized_for_every_profile() {
        let encoder = FfmpegEncoder::new("ffmpeg", 6);
        for height in [240, 720] {
            let args = encoder.build_args(
                Path::new("in.mp4"),
                Path::new("out"),
                &QualityProfile::new(height, 800),
            );
            assert_eq!(arg_after(&args, "-b:a"), "128k");
            assert_eq!(arg_after(&args, "-ar"), "44100");
            assert_eq!(arg_after(&args, "-ac"), "2");
            assert_eq!(arg_after(&args, "-hls_time"), "6");
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_encoder_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FfmpegEncoder::new("/nonexistent/bin/ffmpeg-missing", 10);
        let err = encoder
            .encode_rendition(
                &dir.path().join("input.mp4"),
                dir.path(),
                &QualityProfile::new(240, 400),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::EncoderUnavailable(_)));
    }

    #[test]
    fn test_stderr_tail_keeps_end() {
        let long = "a".repeat(5000) + "final error";
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.len() <= STDERR_TAIL);
        assert!(tail.ends_with("final error"));
    }
}
