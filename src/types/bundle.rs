//! Score bundle: everything the report stages know about one assessment.

use super::{SentimentResult, Transcript};
use crate::metrics::SpeechMetrics;
use serde::{Deserialize, Serialize};

/// The three game scores of an assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScores {
    #[serde(default, alias = "stroop")]
    pub stroop_colour: i64,
    #[serde(default, alias = "memory")]
    pub memory_game: i64,
    #[serde(default)]
    pub image_recall: i64,
}

impl GameScores {
    pub fn new(stroop_colour: i64, memory_game: i64, image_recall: i64) -> Self {
        Self {
            stroop_colour,
            memory_game,
            image_recall,
        }
    }
}

/// Aggregate of one assessment run.
///
/// `speech_metrics`, `sentiment` and `transcriptions` are index-aligned with
/// the audio sources and always have the same, non-zero length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    #[serde(flatten)]
    pub scores: GameScores,
    pub speech_metrics: Vec<SpeechMetrics>,
    pub sentiment: Vec<SentimentResult>,
    pub combined_sentiment: SentimentResult,
    /// Metrics over the concatenated transcript; this is what risk is scored on.
    pub combined_metrics: SpeechMetrics,
    pub transcriptions: Vec<Transcript>,
    pub transcribed_text: String,
}

impl ScoreBundle {
    /// Bundle for a run without any usable audio source.
    pub fn placeholder(scores: GameScores) -> Self {
        Self {
            scores,
            speech_metrics: vec![SpeechMetrics::default()],
            sentiment: vec![SentimentResult::empty()],
            combined_sentiment: SentimentResult::empty(),
            combined_metrics: SpeechMetrics::default(),
            transcriptions: vec![Transcript::empty()],
            transcribed_text: String::new(),
        }
    }

    pub fn audio_files_count(&self) -> usize {
        self.transcriptions.len()
    }

    /// Number of slots that carried speech.
    pub fn transcribed_count(&self) -> usize {
        self.transcriptions.iter().filter(|t| t.has_text()).count()
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.transcriptions.len();
        n >= 1 && self.speech_metrics.len() == n && self.sentiment.len() == n
    }
}
