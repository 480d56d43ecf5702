// Subtitle model and timed-text encoders

pub mod segment;
pub mod srt;
pub mod vtt;

pub use segment::SubtitleSegment;

use serde::{Deserialize, Serialize};

/// Timed-text format used when exporting a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    Vtt,
}

impl SubtitleFormat {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Some(SubtitleFormat::Vtt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "text/plain",
            SubtitleFormat::Vtt => "text/vtt",
        }
    }

    pub fn encode(&self, segments: &[SubtitleSegment]) -> String {
        match self {
            SubtitleFormat::Srt => srt::encode(segments),
            SubtitleFormat::Vtt => vtt::encode(segments),
        }
    }
}

/// Converts a seconds value to whole milliseconds, truncating.
///
/// Works on the shortest decimal text of the value, so `3661.999` (stored as
/// `3661.99899999...`) keeps its last millisecond and nothing ever carries
/// into the next unit. Negative and non-finite inputs saturate to zero.
pub(crate) fn seconds_to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }

    let text = seconds.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let whole: u64 = whole.parse().unwrap_or(u64::MAX / 1_000);
    let millis: u64 = format!("{:0<3}", &fraction[..fraction.len().min(3)])
        .parse()
        .unwrap_or(0);
    whole.saturating_mul(1_000).saturating_add(millis)
}

/// Renders `HH:MM:SS<sep>mmm`. Hours widen past two digits instead of wrapping.
pub(crate) fn format_timestamp(seconds: f64, millis_separator: char) -> String {
    let ms = seconds_to_millis(seconds);
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, mins, secs, millis_separator, millis
    )
}
