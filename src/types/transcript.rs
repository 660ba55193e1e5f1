//! Transcript types.
//!
//! Field names follow Whisper's JSON output so a transcription file can be
//! deserialized directly; unknown fields (`id`, `seek`, `tokens`, ...) are ignored.

use serde::{Deserialize, Serialize};

/// A segment of transcribed text with timing in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).abs()
    }
}

/// Speech-to-text output for one audio source.
///
/// An empty transcript is the placeholder for missing or unreadable audio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Transcript {
    pub fn new(text: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            text: text.into(),
            segments,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// No usable speech: blank text and no segments.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.segments.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Latest segment end time, 0 without segments.
    pub fn total_time(&self) -> f64 {
        self.segments.iter().map(|s| s.end).fold(0.0, f64::max)
    }

    /// Join transcripts into one continuous timeline.
    ///
    /// Texts are trimmed and space-joined (blank ones skipped); each
    /// transcript's segments are shifted by the running total time of the
    /// ones before it.
    pub fn concat<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a Transcript>,
    {
        let mut texts = Vec::new();
        let mut segments = Vec::new();
        let mut offset = 0.0;
        for part in parts {
            let text = part.text.trim();
            if !text.is_empty() {
                texts.push(text);
            }
            segments.extend(
                part.segments
                    .iter()
                    .map(|s| Segment::new(s.start + offset, s.end + offset, s.text.clone())),
            );
            offset += part.total_time();
        }
        Self {
            text: texts.join(" "),
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_json_shape() {
        let json = r#"{
            "text": " Hello there.",
            "language": "en",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 1.5, "text": " Hello there.", "tokens": [1, 2]}
            ]
        }"#;
        let t: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(t.segments.len(), 1);
        assert_eq!(t.segments[0].duration(), 1.5);
        assert_eq!(t.total_time(), 1.5);
    }

    #[test]
    fn test_concat_offsets_and_skips_blank_text() {
        let a = Transcript::new(" first ", vec![Segment::new(0.0, 2.0, "first")]);
        let b = Transcript::empty();
        let c = Transcript::new("second", vec![Segment::new(0.5, 1.0, "second")]);
        let joined = Transcript::concat([&a, &b, &c]);
        assert_eq!(joined.text, "first second");
        assert_eq!(joined.segments[1].start, 2.5);
        assert_eq!(joined.total_time(), 3.0);
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(Transcript::empty().is_empty());
        assert!(!Transcript::new("hi", vec![]).is_empty());
    }
}
