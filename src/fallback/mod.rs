//! 回退内容模块：在生成阶段不可用时输出确定性的模板化报告、摘要与邮件。
//!
//! # Fallback Content
//!
//! Every function here is a pure function of
//! `(ScoreBundle, RiskAssessment, disclaimer)`: no clock, no randomness and no
//! I/O, so the same inputs always render byte-identical text. Each document
//! ends with the disclaimer, which appears exactly once. Slots without speech
//! print [`NO_SPEECH`] rather than their zero metrics and neutral sentiment.
//!
//! | Function | Content |
//! |----------|---------|
//! | [`FallbackContentGenerator::doctor_report`] | Every game score, per-file metric and sentiment, combined values, risk breakdown |
//! | [`FallbackContentGenerator::summary`] | Scores, combined metrics, risk category and next steps |
//! | [`FallbackContentGenerator::email`] | Thank-you note naming the scores and risk category |

use crate::metrics::SpeechMetrics;
use crate::risk::RiskAssessment;
use crate::types::{ScoreBundle, SentimentResult};

/// Transcript characters quoted in the fallback doctor report.
pub const TRANSCRIPT_EXCERPT_CHARS: usize = 500;

/// Written in place of metrics and sentiment for a slot without speech.
pub const NO_SPEECH: &str = "no speech captured (source unavailable)";

pub struct FallbackContentGenerator;

impl FallbackContentGenerator {
    pub fn doctor_report(bundle: &ScoreBundle, risk: &RiskAssessment, disclaimer: &str) -> String {
        let mut out = String::new();
        out.push_str("# COGNITIVE ASSESSMENT REPORT\n");
        out.push_str("**Assessment Method:** Automated Cognitive Screening (template report)\n\n");
        out.push_str("## OVERVIEW\n");
        out.push_str(
            "This automated assessment covers memory performance, attention control (Stroop \
             test), visual recall, speech patterns and sentiment indicators. AI report \
             generation was unavailable, so this report lists the measured values without \
             interpretation.\n\n",
        );

        out.push_str("## ASSESSMENT METRICS\n\n### Game-Based Assessments\n");
        push_scores(&mut out, bundle);

        let transcribed = bundle.transcribed_text.trim();
        out.push_str(&format!(
            "\n### Speech Analysis Summary\n\
             - Audio Files Processed: {}\n\
             - Audio Files With Speech: {}\n\
             - Total Speech Content: {} characters\n\
             - Transcription Available: {}\n",
            bundle.audio_files_count(),
            bundle.transcribed_count(),
            bundle.transcribed_text.chars().count(),
            if transcribed.is_empty() { "No" } else { "Yes" }
        ));

        out.push_str("\n### Speech Metrics Analysis\n");
        for (i, metrics) in bundle.speech_metrics.iter().enumerate() {
            out.push_str(&format!("\n**Audio File {} Metrics:**\n", i + 1));
            if slot_has_speech(bundle, i) {
                push_metrics(&mut out, metrics);
            } else {
                out.push_str(&format!("- {}\n", NO_SPEECH));
            }
        }
        out.push_str("\n**Combined Metrics (all audio files):**\n");
        if transcribed.is_empty() {
            out.push_str(&format!("- {}\n", NO_SPEECH));
        } else {
            push_metrics(&mut out, &bundle.combined_metrics);
        }

        out.push_str("\n### Sentiment Analysis Summary\n");
        for (i, sentiment) in bundle.sentiment.iter().enumerate() {
            out.push_str(&format!("\n**Audio File {} Sentiment:**\n", i + 1));
            if slot_has_speech(bundle, i) {
                push_sentiment(&mut out, sentiment);
            } else {
                out.push_str(&format!("- {}\n", NO_SPEECH));
            }
        }
        out.push_str("\n**Combined Sentiment:**\n");
        if transcribed.is_empty() {
            out.push_str(&format!("- {}\n", NO_SPEECH));
        } else {
            push_sentiment(&mut out, &bundle.combined_sentiment);
        }

        out.push_str(&format!(
            "\n## HEURISTIC COGNITIVE RISK ASSESSMENT\n\n\
             **Risk Category:** {}\n\
             **Probability:** {}\n\n\
             **Contributing Factors:**\n",
            risk.category, risk.probability
        ));
        for (name, value) in risk.factors.entries() {
            out.push_str(&format!("- {}: {}\n", name, value));
        }
        out.push_str(
            "\n**Important Note:** This is a preliminary screening tool, not a medical \
             diagnosis. Professional medical evaluation is recommended regardless of results.\n",
        );

        out.push_str(
            "\n## RECOMMENDATIONS\n\n\
             1. Review these results with a healthcare provider.\n\
             2. Discuss any concerns about memory or cognitive function.\n\
             3. Maintain regular exercise, sleep and mentally stimulating activities.\n\
             4. Consider a repeat assessment in 6-12 months.\n",
        );

        out.push_str("\n## TRANSCRIPT EXCERPT\n");
        if transcribed.is_empty() {
            out.push_str("(no transcript available)\n");
        } else {
            let excerpt: String = transcribed.chars().take(TRANSCRIPT_EXCERPT_CHARS).collect();
            out.push_str(&excerpt);
            if transcribed.chars().count() > TRANSCRIPT_EXCERPT_CHARS {
                out.push_str("...");
            }
            out.push('\n');
        }

        out.push_str("\n---\n");
        out.push_str(disclaimer);
        out
    }

    pub fn summary(bundle: &ScoreBundle, risk: &RiskAssessment, disclaimer: &str) -> String {
        let mut out = String::new();
        out.push_str("## ASSESSMENT SUMMARY\n\n");
        out.push_str(
            "A preliminary automated cognitive screening was completed. AI summarisation was \
             unavailable; the values below are reported as measured.\n\n",
        );
        out.push_str("**Key Highlights:**\n");
        push_scores(&mut out, bundle);
        out.push_str(&format!("- Audio Files Processed: {}\n", bundle.audio_files_count()));
        if bundle.transcribed_text.trim().is_empty() {
            out.push_str(&format!("- Speech: {}\n", NO_SPEECH));
        } else {
            let metrics = &bundle.combined_metrics;
            let sentiment = &bundle.combined_sentiment;
            out.push_str(&format!(
                "- Pause Density (%): {}\n\
                 - Filler Frequency (%): {}\n\
                 - Lexical Diversity (%): {}\n\
                 - Speech Fluency: {}\n\
                 - Overall Sentiment: {} ({})\n",
                metrics.pause_density,
                metrics.filler_frequency,
                metrics.lexical_diversity,
                metrics.fluency,
                sentiment.label,
                sentiment.weighted_score
            ));
        }
        out.push_str(
            "\n**Next Steps Checklist:**\n\
             - [ ] Schedule a consultation with a healthcare provider\n\
             - [ ] Discuss the results and any cognitive concerns\n\
             - [ ] Plan a follow-up assessment in 6-12 months\n",
        );
        out.push_str(&format!(
            "\n**Overall Cognitive Risk Level:** {} (heuristic probability {})\n\n",
            risk.category, risk.probability
        ));
        out.push_str(disclaimer);
        out
    }

    pub fn email(bundle: &ScoreBundle, risk: &RiskAssessment, disclaimer: &str) -> String {
        let s = &bundle.scores;
        let mut out = String::new();
        out.push_str("Dear Valued User,\n\n");
        out.push_str(
            "Thank you for completing the Early Spark cognitive assessment. Your screening \
             has been processed across memory, attention and speech.\n\n",
        );
        out.push_str(
            "Our AI analysis services were temporarily unavailable, so this message was \
             prepared from your recorded results:\n",
        );
        out.push_str(&format!(
            "- Memory game: {}\n\
             - Stroop colour test: {}\n\
             - Image recall: {}\n\
             - Heuristic screening level: {}\n",
            s.memory_game, s.stroop_colour, s.image_recall, risk.category
        ));
        out.push_str(
            "\nWe recommend discussing these results with your healthcare provider for \
             professional interpretation.\n\n\
             Best regards,\nThe Early Spark Team\n\n",
        );
        out.push_str(disclaimer);
        out
    }
}

/// Whether slot `i` carried speech; placeholder slots report nothing measured.
fn slot_has_speech(bundle: &ScoreBundle, i: usize) -> bool {
    bundle.transcriptions.get(i).map_or(false, |t| t.has_text())
}

fn push_scores(out: &mut String, bundle: &ScoreBundle) {
    let s = &bundle.scores;
    out.push_str(&format!(
        "- Memory Game Score: {}\n\
         - Stroop Colour Test Score: {}\n\
         - Image Recall Score: {}\n",
        s.memory_game, s.stroop_colour, s.image_recall
    ));
}

fn push_metrics(out: &mut String, metrics: &SpeechMetrics) {
    for (name, value) in metrics.entries() {
        out.push_str(&format!("- {}: {}\n", name, value));
    }
}

fn push_sentiment(out: &mut String, sentiment: &SentimentResult) {
    out.push_str(&format!(
        "- Label: {}\n- Weighted Score: {}\n",
        sentiment.label, sentiment.weighted_score
    ));
    if !sentiment.probabilities.is_empty() {
        let probs: Vec<String> = sentiment.probabilities.iter().map(|p| p.to_string()).collect();
        out.push_str(&format!("- Class Probabilities: [{}]\n", probs.join(", ")));
    }
}
