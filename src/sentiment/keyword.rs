//! Keyword-based sentiment heuristic.

use super::SentimentService;
use crate::types::{SentimentLabel, SentimentResult};
use crate::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const POSITIVE_SCORE: f64 = 70.0;
const NEGATIVE_SCORE: f64 = 30.0;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("word pattern is a valid regex"));

const DEFAULT_POSITIVE: &[&str] = &[
    "good", "great", "happy", "well", "fine", "love", "enjoy", "enjoyed", "nice", "wonderful",
    "excellent", "glad", "calm", "better", "fun", "lovely", "grateful", "excited", "pleasant",
    "amazing",
];

const DEFAULT_NEGATIVE: &[&str] = &[
    "bad", "sad", "tired", "worried", "worse", "angry", "pain", "hate", "awful", "terrible",
    "confused", "lonely", "afraid", "scared", "anxious", "upset", "forget", "forgot", "lost",
    "difficult",
];

/// Counts positive and negative keywords; the larger side decides the label.
#[derive(Debug, Clone)]
pub struct KeywordSentiment {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIVE.iter().copied(), DEFAULT_NEGATIVE.iter().copied())
    }
}

impl KeywordSentiment {
    pub fn new<P, N, S>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positive: positive.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            negative: negative.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();
        let (mut pos, mut neg) = (0usize, 0usize);
        for m in WORD.find_iter(&lower) {
            let word = m.as_str();
            if self.positive.contains(word) {
                pos += 1;
            } else if self.negative.contains(word) {
                neg += 1;
            }
        }
        if pos > neg {
            SentimentResult::heuristic(SentimentLabel::Positive, POSITIVE_SCORE)
        } else if neg > pos {
            SentimentResult::heuristic(SentimentLabel::Negative, NEGATIVE_SCORE)
        } else {
            SentimentResult::heuristic(SentimentLabel::Neutral, SentimentResult::NEUTRAL_SCORE)
        }
    }
}

#[async_trait]
impl SentimentService for KeywordSentiment {
    async fn predict(&self, text: &str) -> Result<SentimentResult> {
        Ok(self.classify(text))
    }
}
