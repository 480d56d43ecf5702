//! WebVTT subtitle encoder.

use super::{format_timestamp, SubtitleSegment};

pub fn vtt_time(seconds: f64) -> String {
    format_timestamp(seconds, '.')
}

pub fn encode(segments: &[SubtitleSegment]) -> String {
    let mut out = String::from("WEBVTT\n\n");

    for seg in segments {
        out.push_str(&vtt_time(seg.start_time));
        out.push_str(" --> ");
        out.push_str(&vtt_time(seg.end_time));
        out.push('\n');
        out.push_str(&seg.text);
        out.push_str("\n\n");
    }

    out
}
