//! Prompt templates for the three report stages.

use crate::risk::RiskAssessment;
use crate::types::ScoreBundle;
use serde_json::json;

/// Verbatim transcript characters included in the doctor prompt.
pub const TRANSCRIPT_PROMPT_CHARS: usize = 1200;

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn doctor_report(bundle: &ScoreBundle, risk: &RiskAssessment, disclaimer: &str) -> String {
        let metrics = json!({
            "stroop_colour": bundle.scores.stroop_colour,
            "memory_game": bundle.scores.memory_game,
            "image_recall": bundle.scores.image_recall,
            "speech_metrics_per_file": bundle.speech_metrics,
            "sentiment_per_file": bundle.sentiment,
            "combined_sentiment": bundle.combined_sentiment,
            "audio_files_count": bundle.audio_files_count(),
            "heuristic_risk": {
                "probability": risk.probability,
                "category": risk.category,
                "factors": risk.factors,
            },
        });
        let metrics = serde_json::to_string_pretty(&metrics).unwrap_or_else(|_| metrics.to_string());
        let transcript: String = bundle.transcribed_text.chars().take(TRANSCRIPT_PROMPT_CHARS).collect();

        format!(
            "You are to write a comprehensive, detailed cognitive assessment report. \
             Use ONLY the JSON metrics provided (do not fabricate missing game scores). \
             Explain methodology, interpretation, influencing factors (speech pauses, fillers, \
             lexical diversity, sentiment), and recommendations. Structure the report with the \
             sections: Overview, Metrics Explanation, Memory Game Analysis, Image Recall, Stroop \
             Colour, Speech and Sentiment Analysis, Heuristic Cognitive Risk Assessment, \
             Integrated Interpretation, Recommendations, Disclaimer. State the heuristic risk \
             category and probability as given; do not re-calculate them.\n\
             Metrics JSON: {metrics}\n\
             Transcript (verbatim): {transcript}\n\
             Include this disclaimer exactly once at the end: {disclaimer}"
        )
    }

    pub fn summary(doctor_report: &str, disclaimer: &str) -> String {
        format!(
            "Summarize the following clinical-style report into: (1) concise paragraph, \
             (2) bullet highlights, (3) next steps checklist, (4) one word overall cognitive \
             risk level (Low, Mild, Moderate, Elevated). Preserve numeric values. Explicitly \
             state the heuristic cognitive risk category & probability (do not re-calc). End \
             with the disclaimer.\n{doctor_report}\nDISCLAIMER: {disclaimer}"
        )
    }

    pub fn email(summary: &str, disclaimer: &str) -> String {
        format!(
            "Write a polite thank-you email to the user summarizing the assessment outcome. \
             No diagnosis. Under 220 words. Reference major metrics (by descriptive names). \
             End with the disclaimer.\n{summary}\nDISCLAIMER: {disclaimer}"
        )
    }
}
