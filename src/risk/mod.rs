//! 风险评估模块：将语音指标与情感合成为有界的风险概率与类别。
//!
//! # Risk Scorer
//!
//! Each input is normalised into `[0, 1]` and combined with fixed weights:
//!
//! | Factor | Normalisation | Weight |
//! |--------|---------------|--------|
//! | pause | `min(pause_density / 60, 1)` | 0.25 |
//! | filler | `min(filler_frequency / 30, 1)` | 0.20 |
//! | lexical | `1 − min(lexical_diversity / 70, 1)` | 0.25 |
//! | fluency | `1 − min(max(fluency, 0) / 90, 1)` | 0.25 |
//! | mood | step function of the weighted sentiment | additive |
//!
//! The sum is clamped to `[0, 1]`, rounded to 3 decimals and bucketed by
//! [`RiskCategory::from_probability`].

use crate::metrics::{round_to, SpeechMetrics};
use crate::types::{ScoreBundle, SentimentResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Mild,
    Moderate,
    Elevated,
}

impl RiskCategory {
    pub fn from_probability(p: f64) -> Self {
        if p < 0.25 {
            RiskCategory::Low
        } else if p < 0.45 {
            RiskCategory::Mild
        } else if p < 0.65 {
            RiskCategory::Moderate
        } else {
            RiskCategory::Elevated
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Mild => "Mild",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::Elevated => "Elevated",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw inputs and their normalised contributions, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub pause_density: f64,
    pub filler_frequency: f64,
    pub lexical_diversity: f64,
    pub fluency: f64,
    pub weighted_sentiment: f64,
    pub r_pause: f64,
    pub r_filler: f64,
    pub r_lex: f64,
    pub r_fluency: f64,
    pub r_mood: f64,
}

impl RiskFactors {
    pub fn entries(&self) -> [(&'static str, f64); 10] {
        [
            ("pause_density", self.pause_density),
            ("filler_frequency", self.filler_frequency),
            ("lexical_diversity", self.lexical_diversity),
            ("fluency", self.fluency),
            ("weighted_sentiment", self.weighted_sentiment),
            ("r_pause", self.r_pause),
            ("r_filler", self.r_filler),
            ("r_lex", self.r_lex),
            ("r_fluency", self.r_fluency),
            ("r_mood", self.r_mood),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub category: RiskCategory,
    pub factors: RiskFactors,
}

/// Stateless scorer; every call is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, metrics: &SpeechMetrics, sentiment: &SentimentResult) -> RiskAssessment {
        let weighted = sentiment.weighted_score;
        let r_pause = (metrics.pause_density / 60.0).min(1.0);
        let r_filler = (metrics.filler_frequency / 30.0).min(1.0);
        let r_lex = 1.0 - (metrics.lexical_diversity / 70.0).min(1.0);
        let r_fluency = 1.0 - (metrics.fluency.max(0.0) / 90.0).min(1.0);
        let r_mood = mood_adjustment(weighted);

        let raw = 0.25 * r_pause + 0.20 * r_filler + 0.25 * r_lex + 0.25 * r_fluency + r_mood;
        // Thresholds apply to the unrounded value; only the report is rounded.
        let clamped = raw.clamp(0.0, 1.0);

        RiskAssessment {
            probability: round_to(clamped, 3),
            category: RiskCategory::from_probability(clamped),
            factors: RiskFactors {
                pause_density: metrics.pause_density,
                filler_frequency: metrics.filler_frequency,
                lexical_diversity: metrics.lexical_diversity,
                fluency: metrics.fluency,
                weighted_sentiment: weighted,
                r_pause,
                r_filler,
                r_lex,
                r_fluency,
                r_mood,
            },
        }
    }

    /// Score the bundle's combined metrics and combined sentiment.
    pub fn assess_bundle(&self, bundle: &ScoreBundle) -> RiskAssessment {
        self.assess(&bundle.combined_metrics, &bundle.combined_sentiment)
    }
}

fn mood_adjustment(weighted: f64) -> f64 {
    if weighted < 40.0 {
        0.15
    } else if weighted < 55.0 {
        0.05
    } else if weighted > 80.0 {
        -0.03
    } else {
        0.0
    }
}
