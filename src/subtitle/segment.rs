use serde::{Deserialize, Serialize};

/// One timed cue as produced by the transcription service.
///
/// Times are seconds from the start of the video. Segments are kept in the
/// order the service sent them; nothing here sorts or validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl SubtitleSegment {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// False for negative starts or cues that end before they begin.
    /// Encoders still emit such cues.
    pub fn is_well_formed(&self) -> bool {
        self.start_time >= 0.0 && self.end_time >= self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed() {
        assert!(SubtitleSegment::new(0.0, 0.0, "").is_well_formed());
        assert!(SubtitleSegment::new(1.0, 2.5, "a").is_well_formed());
        assert!(!SubtitleSegment::new(3.0, 2.0, "b").is_well_formed());
        assert!(!SubtitleSegment::new(-1.0, 2.0, "c").is_well_formed());
    }
}
