//! 聚合模块：将每个音频源的转录、指标与情感合并为评分包。
//!
//! # Aggregation
//!
//! Every non-blank audio source gets one slot. Sources are processed with
//! bounded concurrency and each result is written into the slot at its
//! source index, so output order always matches input order. A failing
//! source leaves an empty placeholder in its slot and never aborts the batch.
//!
//! After all slots are filled the non-empty texts are trimmed and
//! space-joined into the combined text, which is scored for sentiment once.

use crate::metrics::SpeechMetrics;
use crate::sentiment::SentimentService;
use crate::stt::TranscriptionService;
use crate::types::{GameScores, ScoreBundle, SentimentResult, Transcript};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// One source's analytics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    pub transcript: Transcript,
    pub metrics: SpeechMetrics,
    pub sentiment: SentimentResult,
}

impl Slot {
    pub fn placeholder() -> Self {
        Self::default()
    }
}

pub struct Aggregator {
    transcriber: Arc<dyn TranscriptionService>,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(transcriber: Arc<dyn TranscriptionService>) -> Self {
        Self {
            transcriber,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn aggregate(
        &self,
        scores: GameScores,
        sources: &[String],
        sentiment: &dyn SentimentService,
    ) -> ScoreBundle {
        let valid: Vec<&str> = sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if valid.len() < sources.len() {
            tracing::warn!(
                skipped = sources.len() - valid.len(),
                "blank audio source identifiers skipped"
            );
        }
        if valid.is_empty() {
            tracing::warn!("no audio sources provided; using empty audio analysis");
            return ScoreBundle::placeholder(scores);
        }

        tracing::info!(count = valid.len(), "processing audio sources");
        let start = Instant::now();
        let total = valid.len();

        let mut arena: Vec<Option<Slot>> = vec![None; total];
        let mut results = futures::stream::iter(valid.iter().copied().enumerate())
            .map(|(index, source)| async move {
                (index, self.process(index, total, source, sentiment).await)
            })
            .buffer_unordered(self.concurrency);
        while let Some((index, slot)) = results.next().await {
            arena[index] = Some(slot);
        }

        let slots: Vec<Slot> = arena
            .into_iter()
            .map(|slot| slot.unwrap_or_else(Slot::placeholder))
            .collect();

        let transcriptions: Vec<Transcript> = slots.iter().map(|s| s.transcript.clone()).collect();
        let combined = Transcript::concat(&transcriptions);
        let combined_sentiment = score_text(sentiment, &combined.text, "combined").await;
        let combined_metrics = SpeechMetrics::compute(&combined);

        tracing::info!(
            sources = total,
            transcribed = transcriptions.iter().filter(|t| t.has_text()).count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "score bundle prepared"
        );

        ScoreBundle {
            scores,
            speech_metrics: slots.iter().map(|s| s.metrics).collect(),
            sentiment: slots.into_iter().map(|s| s.sentiment).collect(),
            combined_sentiment,
            combined_metrics,
            transcriptions,
            transcribed_text: combined.text,
        }
    }

    async fn process(
        &self,
        index: usize,
        total: usize,
        source: &str,
        sentiment: &dyn SentimentService,
    ) -> Slot {
        tracing::info!(file = index + 1, total, source, "processing audio file");
        let transcript = match self.transcriber.transcribe(source).await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file = index + 1, source, error = %e, "audio source failed; using empty placeholder");
                return Slot::placeholder();
            }
        };
        let metrics = SpeechMetrics::compute(&transcript);
        let sentiment = score_text(sentiment, &transcript.text, source).await;
        Slot {
            transcript,
            metrics,
            sentiment,
        }
    }
}

async fn score_text(service: &dyn SentimentService, text: &str, label: &str) -> SentimentResult {
    if text.trim().is_empty() {
        return SentimentResult::empty();
    }
    match service.predict(text).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target_text = label, error = %e, "sentiment failed; using neutral default");
            SentimentResult::empty()
        }
    }
}
