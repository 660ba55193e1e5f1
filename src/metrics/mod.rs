//! 语音指标模块：从单个转录计算确定性的语音/语言学指标。
//!
//! # Speech Metrics
//!
//! Deterministic metrics for one [`Transcript`]:
//!
//! | Metric | Definition |
//! |--------|------------|
//! | total time | latest segment end |
//! | total pause time | sum of durations of segments longer than [`PAUSE_SEGMENT_SECS`] |
//! | pause density % | `pause / (pause + total) · 100` |
//! | repeated words | Σ (count − 1) over tokens seen more than once |
//! | filler frequency % | filler tokens / tokens · 100 |
//! | lexical diversity % | tokens seen exactly once / tokens · 100 |
//! | fluency | `100 − 0.6·pause − 0.8·filler − 1.5·repeated + 0.2·lexical` |
//!
//! "Pause" time counts long (slow, halting) segments, not the silence between
//! segments. Fluency is deliberately left unclamped.

mod tokenize;

pub use tokenize::{normalize, token_counts, FILLER_WORDS};

use crate::types::Transcript;
use serde::{Deserialize, Serialize};

/// Segments longer than this count toward pause time.
pub const PAUSE_SEGMENT_SECS: f64 = 0.8;

/// Derived metrics for one transcript. Computed once, never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechMetrics {
    pub total_time: f64,
    pub total_pause_time: f64,
    pub pause_density: f64,
    pub repeated_words: f64,
    pub filler_words: f64,
    pub filler_frequency: f64,
    pub unique_words: f64,
    pub lexical_diversity: f64,
    pub fluency: f64,
}

impl SpeechMetrics {
    /// Compute metrics for a transcript. Blank text yields all zeros.
    pub fn compute(transcript: &Transcript) -> Self {
        let counts = token_counts(&transcript.text);
        let total_tokens: usize = counts.values().sum();
        if total_tokens == 0 {
            return Self::default();
        }

        let mut total_time = 0.0_f64;
        let mut total_pause_time = 0.0_f64;
        for segment in &transcript.segments {
            total_time = total_time.max(segment.end);
            let duration = segment.duration();
            if duration > PAUSE_SEGMENT_SECS {
                total_pause_time += duration;
            }
        }
        let timeline = total_pause_time + total_time;
        let pause_density = if timeline > 0.0 {
            round_to(total_pause_time / timeline * 100.0, 4)
        } else {
            0.0
        };

        let repeated_words: usize = counts.values().filter(|c| **c > 1).map(|c| c - 1).sum();
        let filler_words: usize = FILLER_WORDS
            .iter()
            .map(|fw| counts.get(*fw).copied().unwrap_or(0))
            .sum();
        let unique_words = counts.values().filter(|c| **c == 1).count();

        let tokens = total_tokens as f64;
        let filler_frequency = round_to(filler_words as f64 / tokens * 100.0, 4);
        let lexical_diversity = round_to(unique_words as f64 / tokens * 100.0, 4);
        let fluency = round_to(
            100.0 - pause_density * 0.6 - filler_frequency * 0.8 - repeated_words as f64 * 1.5
                + lexical_diversity * 0.2,
            2,
        );

        let metrics = Self {
            total_time,
            total_pause_time,
            pause_density,
            repeated_words: repeated_words as f64,
            filler_words: filler_words as f64,
            filler_frequency,
            unique_words: unique_words as f64,
            lexical_diversity,
            fluency,
        };
        tracing::debug!(
            tokens = total_tokens,
            pause_density,
            filler_frequency,
            lexical_diversity,
            fluency,
            "speech metrics computed"
        );
        metrics
    }

    /// Named view in display order.
    pub fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("Total time (s)", self.total_time),
            ("Total pause time (s)", self.total_pause_time),
            ("Pause density (%)", self.pause_density),
            ("Repeated words", self.repeated_words),
            ("Filler words", self.filler_words),
            ("Filler frequency (%)", self.filler_frequency),
            ("Unique words", self.unique_words),
            ("Lexical diversity (%)", self.lexical_diversity),
            ("Speech fluency", self.fluency),
        ]
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
