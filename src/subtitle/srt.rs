//! SRT (SubRip) subtitle encoder.

use super::{format_timestamp, SubtitleSegment};

pub fn srt_time(seconds: f64) -> String {
    format_timestamp(seconds, ',')
}

/// Encodes segments as SRT text, numbering cues `1..=N` in input order.
///
/// An empty slice yields an empty string; deciding whether that is worth a
/// file is up to the caller.
pub fn encode(segments: &[SubtitleSegment]) -> String {
    let mut out = String::new();

    for (i, seg) in segments.iter().enumerate() {
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&srt_time(seg.start_time));
        out.push_str(" --> ");
        out.push_str(&srt_time(seg.end_time));
        out.push('\n');
        out.push_str(&seg.text);
        out.push_str("\n\n");
    }

    out
}
