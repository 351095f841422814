use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use super::movie::HlsSegment;

/// Target vertical resolution and video bitrate for one rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub height: u32,
    pub bitrate_kbps: u32,
}

/// Renditions produced for every ingested movie, in ascending bitrate order.
pub const DEFAULT_QUALITY_PROFILES: [QualityProfile; 4] = [
    QualityProfile::new(240, 400),
    QualityProfile::new(360, 800),
    QualityProfile::new(480, 1400),
    QualityProfile::new(720, 2800),
];

impl QualityProfile {
    pub const fn new(height: u32, bitrate_kbps: u32) -> Self {
        Self {
            height,
            bitrate_kbps,
        }
    }

    /// Quality label, e.g. `480p`.
    pub fn label(&self) -> String {
        format!("{}p", self.height)
    }

    /// Bitrate in encoder notation, e.g. `1400k`.
    pub fn bitrate(&self) -> String {
        format!("{}k", self.bitrate_kbps)
    }
}

impl Display for QualityProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}p@{}k", self.height, self.bitrate_kbps)
    }
}

/// One uploaded rendition: its playlist and the segments beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenditionResult {
    pub quality: String,
    pub playlist_key: String,
    pub url: String,
    pub segment_keys: Vec<String>,
}

impl From<&RenditionResult> for HlsSegment {
    fn from(rendition: &RenditionResult) -> Self {
        HlsSegment {
            quality: rendition.quality.clone(),
            url: rendition.url.clone(),
        }
    }
}

/// Outcome of a successful transcode: the master manifest plus one entry per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeResult {
    pub manifest_key: String,
    pub manifest_url: String,
    pub renditions: Vec<RenditionResult>,
}

impl TranscodeResult {
    pub fn hls_segments(&self) -> Vec<HlsSegment> {
        self.renditions.iter().map(HlsSegment::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_ascend() {
        let bitrates: Vec<u32> = DEFAULT_QUALITY_PROFILES
            .iter()
            .map(|p| p.bitrate_kbps)
            .collect();
        assert_eq!(bitrates, vec![400, 800, 1400, 2800]);
        assert!(DEFAULT_QUALITY_PROFILES
            .windows(2)
            .all(|w| w[0].height < w[1].height));
    }

    #[test]
    fn test_label_and_bitrate_notation() {
        let profile = QualityProfile::new(480, 1400);
        assert_eq!(profile.label(), "480p");
        assert_eq!(profile.bitrate(), "1400k");
        assert_eq!(profile.to_string(), "480p@1400k");
    }

    #[test]
    fn test_hls_segments_keep_rendition_order() {
        let result = TranscodeResult {
            manifest_key: "v/hls/master.m3u8".to_string(),
            manifest_url: "http://store/v/hls/master.m3u8".to_string(),
            renditions: ["240p", "720p"]
                .iter()
                .map(|q| RenditionResult {
                    quality: q.to_string(),
                    playlist_key: format!("v/hls/{}/playlist.m3u8", q),
                    url: format!("http://store/v/hls/{}/playlist.m3u8", q),
                    segment_keys: vec![],
                })
                .collect(),
        };
        let qualities: Vec<String> = result.hls_segments().into_iter().map(|s| s.quality).collect();
        assert_eq!(qualities, vec!["240p", "720p"]);
    }
}
