//! Master playlist synthesis.
//!
//! Bandwidth and resolution are declared from a static table keyed by
//! quality label, not measured from the encoded output.

use reelstream_core::models::RenditionResult;

const DEFAULT_BANDWIDTH: u64 = 1_000_000;
const DEFAULT_RESOLUTION: &str = "640x360";

/// Declared bandwidth in bits per second for a quality label.
pub fn bandwidth_for(quality: &str) -> u64 {
    match quality {
        "240p" => 400_000,
        "360p" => 800_000,
        "480p" => 1_400_000,
        "720p" => 2_800_000,
        "1080p" => 5_000_000,
        _ => DEFAULT_BANDWIDTH,
    }
}

/// Declared `WIDTHxHEIGHT` for a quality label.
pub fn resolution_for(quality: &str) -> &'static str {
    match quality {
        "240p" => "426x240",
        "360p" => "640x360",
        "480p" => "854x480",
        "720p" => "1280x720",
        "1080p" => "1920x1080",
        _ => DEFAULT_RESOLUTION,
    }
}

/// One stream-info line plus URL per rendition, in the given order.
pub fn build_master_playlist(renditions: &[RenditionResult]) -> String {
    let mut playlist = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");

    for rendition in renditions {
        playlist.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}\n{}\n",
            bandwidth_for(&rendition.quality),
            resolution_for(&rendition.quality),
            rendition.url
        ));
    }

    playlist
}
