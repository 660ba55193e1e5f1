//! Sentiment result types.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Class weights used to fold a five-class distribution into a 0-100 score.
pub const CLASS_WEIGHTS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    /// Classes in model output order.
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryNegative,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::VeryPositive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::VeryNegative => "very negative",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
            SentimentLabel::VeryPositive => "very positive",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment of one text.
///
/// `probabilities` is empty when the result came from the keyword heuristic
/// rather than a five-class model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    #[serde(default)]
    pub probabilities: Vec<f64>,
    pub weighted_score: f64,
}

impl SentimentResult {
    pub const NEUTRAL_SCORE: f64 = 50.0;

    /// Default for texts that carried no speech.
    pub fn empty() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            probabilities: Vec::new(),
            weighted_score: Self::NEUTRAL_SCORE,
        }
    }

    /// Coarse result without a distribution.
    pub fn heuristic(label: SentimentLabel, weighted_score: f64) -> Self {
        Self {
            label,
            probabilities: Vec::new(),
            weighted_score,
        }
    }

    /// Build from a five-class softmax output.
    ///
    /// The label is the argmax (first wins on ties) and the weighted score is
    /// `Σ p·w · 100` rounded to 3 decimals.
    pub fn from_probabilities(probabilities: &[f64]) -> Result<Self> {
        if probabilities.len() != CLASS_WEIGHTS.len() {
            return Err(Error::validation_with_context(
                format!(
                    "expected {} class probabilities, got {}",
                    CLASS_WEIGHTS.len(),
                    probabilities.len()
                ),
                ErrorContext::new().with_field_path("probabilities"),
            ));
        }
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(Error::validation_with_context(
                "probabilities must be finite and non-negative",
                ErrorContext::new().with_field_path("probabilities"),
            ));
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(Error::validation_with_context(
                "probabilities must sum to 1",
                ErrorContext::new()
                    .with_field_path("probabilities")
                    .with_details(format!("sum={sum}")),
            ));
        }

        let mut best = 0;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = i;
            }
        }
        let weighted: f64 = probabilities
            .iter()
            .zip(CLASS_WEIGHTS.iter())
            .map(|(p, w)| p * w)
            .sum();

        Ok(Self {
            label: SentimentLabel::ALL[best],
            probabilities: probabilities.to_vec(),
            weighted_score: (weighted * 100.0 * 1000.0).round() / 1000.0,
        })
    }

    pub fn is_heuristic(&self) -> bool {
        self.probabilities.is_empty()
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score_from_distribution() {
        let r = SentimentResult::from_probabilities(&[0.0, 0.0, 0.0, 0.5, 0.5]).unwrap();
        assert_eq!(r.label, SentimentLabel::Positive);
        assert_eq!(r.weighted_score, 90.0);

        let r = SentimentResult::from_probabilities(&[1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(r.label, SentimentLabel::VeryNegative);
        assert_eq!(r.weighted_score, 20.0);
    }

    #[test]
    fn test_rejects_bad_distributions() {
        assert!(SentimentResult::from_probabilities(&[0.5, 0.5]).is_err());
        assert!(SentimentResult::from_probabilities(&[0.5, 0.5, 0.5, 0.0, 0.0]).is_err());
        assert!(SentimentResult::from_probabilities(&[-0.1, 0.3, 0.3, 0.3, 0.2]).is_err());
    }

    #[test]
    fn test_label_serializes_kebab_case() {
        let json = serde_json::to_string(&SentimentLabel::VeryPositive).unwrap();
        assert_eq!(json, "\"very-positive\"");
        assert!(SentimentResult::empty().is_heuristic());
    }
}
