//! 流水线编排模块：聚合、风险评估与三阶段报告生成的状态机。
//!
//! # Pipeline Orchestrator
//!
//! One run walks a fixed sequence of states:
//!
//! ```text
//! Aggregating → GeneratingDoctorReport → GeneratingSummary → GeneratingEmail → Done
//! ```
//!
//! Aggregation builds the [`ScoreBundle`](crate::ScoreBundle) and the risk is
//! scored from it. Each generation state runs the report agent through a
//! [`StageRunner`]. Exhausted retries, a permanent agent error or a blank
//! reply degrade the stage: its text comes from
//! [`FallbackContentGenerator`] and `fallback_mode` is set for the rest of the
//! run. Once degraded, later stages skip the agent and fall back immediately.
//!
//! Only configuration problems are returned as errors, and they are reported
//! before any stage runs. Every other path ends in a complete
//! [`PipelineResult`].
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Orchestrator`] | Runs assessments; safe to share across concurrent runs |
//! | [`OrchestratorBuilder`] | Wires configuration and collaborators |
//! | [`AssessmentRequest`] | Scores, audio sources and sentiment options of one run |
//! | [`PipelineState`] | The state machine positions |

use crate::agent::{GenerationRequest, PromptBuilder, ReportAgent, ReportStage};
use crate::aggregate::Aggregator;
use crate::config::PipelineConfig;
use crate::fallback::FallbackContentGenerator;
use crate::resilience::{StageFailure, StageRunner};
use crate::risk::{RiskAssessment, RiskScorer};
use crate::sentiment::{DegradingSentiment, KeywordSentiment, SentimentService, SentimentSettings};
use crate::stt::TranscriptionService;
use crate::types::{GameScores, PipelineResult, ScoreBundle};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Aggregating,
    GeneratingDoctorReport,
    GeneratingSummary,
    GeneratingEmail,
    Done,
}

impl PipelineState {
    /// The following state; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PipelineState::Aggregating => PipelineState::GeneratingDoctorReport,
            PipelineState::GeneratingDoctorReport => PipelineState::GeneratingSummary,
            PipelineState::GeneratingSummary => PipelineState::GeneratingEmail,
            PipelineState::GeneratingEmail | PipelineState::Done => PipelineState::Done,
        }
    }

    /// Report stage driven in this state, if any.
    pub fn stage(self) -> Option<ReportStage> {
        match self {
            PipelineState::GeneratingDoctorReport => Some(ReportStage::DoctorReport),
            PipelineState::GeneratingSummary => Some(ReportStage::Summary),
            PipelineState::GeneratingEmail => Some(ReportStage::Email),
            PipelineState::Aggregating | PipelineState::Done => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Aggregating => "aggregating",
            PipelineState::GeneratingDoctorReport => "generating_doctor_report",
            PipelineState::GeneratingSummary => "generating_summary",
            PipelineState::GeneratingEmail => "generating_email",
            PipelineState::Done => "done",
        }
    }
}

/// Input of one assessment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub scores: GameScores,
    #[serde(default)]
    pub audio_sources: Vec<String>,
    #[serde(default)]
    pub sentiment: SentimentSettings,
}

impl AssessmentRequest {
    pub fn new(scores: GameScores) -> Self {
        Self {
            scores,
            ..Default::default()
        }
    }

    pub fn with_audio_sources(mut self, sources: Vec<String>) -> Self {
        self.audio_sources = sources;
        self
    }

    pub fn with_sentiment(mut self, settings: SentimentSettings) -> Self {
        self.sentiment = settings;
        self
    }
}

/// Drives assessment runs. Holds only immutable configuration and shared
/// collaborators; all per-run state lives inside [`Orchestrator::run`].
pub struct Orchestrator {
    config: PipelineConfig,
    aggregator: Aggregator,
    keyword_sentiment: Arc<dyn SentimentService>,
    model_sentiment: Option<Arc<dyn SentimentService>>,
    agent: Arc<dyn ReportAgent>,
    scorer: RiskScorer,
}

impl Orchestrator {
    pub fn builder(config: PipelineConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, request: AssessmentRequest) -> Result<PipelineResult> {
        self.config.validate()?;
        let start = Instant::now();
        let disclaimer = self.config.disclaimer.as_str();

        let mut state = PipelineState::Aggregating;
        tracing::info!(
            state = state.as_str(),
            sources = request.audio_sources.len(),
            "pipeline started"
        );
        let sentiment = self.sentiment_for(&request.sentiment);
        let bundle = self
            .aggregator
            .aggregate(request.scores, &request.audio_sources, sentiment.as_ref())
            .await;
        let risk = self.scorer.assess_bundle(&bundle);
        tracing::info!(
            probability = risk.probability,
            category = risk.category.as_str(),
            "risk assessed"
        );
        state = state.next();

        let mut fallback_mode = false;
        let mut doctor_report = String::new();
        let mut summary = String::new();
        let mut email = String::new();

        while let Some(stage) = state.stage() {
            tracing::info!(state = state.as_str(), "entering stage");
            let outcome = if fallback_mode {
                Err(StageFailure::Skipped)
            } else {
                let prompt = match stage {
                    ReportStage::DoctorReport => PromptBuilder::doctor_report(&bundle, &risk, disclaimer),
                    ReportStage::Summary => PromptBuilder::summary(&doctor_report, disclaimer),
                    ReportStage::Email => PromptBuilder::email(&summary, disclaimer),
                };
                self.generate(stage, prompt).await
            };

            let text = match outcome {
                Ok(text) => text,
                Err(failure) => {
                    tracing::warn!(stage = stage.as_str(), reason = %failure, "using fallback content");
                    fallback_mode = true;
                    fallback_text(stage, &bundle, &risk, disclaimer)
                }
            };
            match stage {
                ReportStage::DoctorReport => doctor_report = text,
                ReportStage::Summary => summary = text,
                ReportStage::Email => email = text,
            }
            state = state.next();
        }

        tracing::info!(
            state = state.as_str(),
            fallback_mode,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pipeline finished"
        );
        Ok(PipelineResult::new(
            bundle,
            risk,
            doctor_report,
            summary,
            email,
            fallback_mode,
        ))
    }

    async fn generate(&self, stage: ReportStage, prompt: String) -> std::result::Result<String, StageFailure> {
        let request = GenerationRequest { stage, prompt };
        let runner = StageRunner::new(stage.as_str(), self.config.retry_for(stage).clone());
        let agent = &self.agent;
        let request = &request;
        let text = runner.run(move || agent.generate(request)).await?;
        if text.trim().is_empty() {
            return Err(StageFailure::Empty);
        }
        Ok(text)
    }

    fn sentiment_for(&self, settings: &SentimentSettings) -> Arc<dyn SentimentService> {
        match &self.model_sentiment {
            Some(model) if !settings.offline => model.clone(),
            _ => self.keyword_sentiment.clone(),
        }
    }
}

fn fallback_text(stage: ReportStage, bundle: &ScoreBundle, risk: &RiskAssessment, disclaimer: &str) -> String {
    match stage {
        ReportStage::DoctorReport => FallbackContentGenerator::doctor_report(bundle, risk, disclaimer),
        ReportStage::Summary => FallbackContentGenerator::summary(bundle, risk, disclaimer),
        ReportStage::Email => FallbackContentGenerator::email(bundle, risk, disclaimer),
    }
}

/// Builder for [`Orchestrator`]. A transcriber and an agent are required;
/// without a sentiment model every run uses the keyword heuristic.
pub struct OrchestratorBuilder {
    config: PipelineConfig,
    transcriber: Option<Arc<dyn TranscriptionService>>,
    sentiment_model: Option<Arc<dyn SentimentService>>,
    agent: Option<Arc<dyn ReportAgent>>,
}

impl OrchestratorBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            transcriber: None,
            sentiment_model: None,
            agent: None,
        }
    }

    pub fn transcriber(mut self, transcriber: impl TranscriptionService + 'static) -> Self {
        self.transcriber = Some(Arc::new(transcriber));
        self
    }

    pub fn sentiment_model(mut self, model: impl SentimentService + 'static) -> Self {
        self.sentiment_model = Some(Arc::new(model));
        self
    }

    pub fn agent(mut self, agent: impl ReportAgent + 'static) -> Self {
        self.agent = Some(Arc::new(agent));
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        self.config.validate()?;
        let transcriber = self.transcriber.ok_or_else(|| missing("transcriber"))?;
        let agent = self.agent.ok_or_else(|| missing("agent"))?;
        let aggregator = Aggregator::new(transcriber).with_concurrency(self.config.concurrency);
        let model_sentiment = self
            .sentiment_model
            .map(|m| Arc::new(DegradingSentiment::new(m)) as Arc<dyn SentimentService>);

        Ok(Orchestrator {
            config: self.config,
            aggregator,
            keyword_sentiment: Arc::new(KeywordSentiment::default()),
            model_sentiment,
            agent,
            scorer: RiskScorer::new(),
        })
    }
}

fn missing(what: &str) -> Error {
    Error::configuration_with_context(
        format!("orchestrator requires a {}", what),
        ErrorContext::new()
            .with_field_path(what)
            .with_source("orchestrator"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::OfflineAgent;
    use crate::resilience::RetryPolicy;
    use crate::types::{AiServiceStatus, SentimentLabel, SentimentResult, Transcript};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct NoAudio;

    #[async_trait]
    impl TranscriptionService for NoAudio {
        async fn transcribe(&self, source: &str) -> Result<Transcript> {
            Err(Error::source_unavailable(source, "not found"))
        }
    }

    /// Replies per stage from a script and records every call.
    #[derive(Default)]
    struct ScriptedAgent {
        replies: HashMap<ReportStage, Result<String>>,
        calls: Mutex<Vec<ReportStage>>,
    }

    impl ScriptedAgent {
        fn reply(mut self, stage: ReportStage, text: &str) -> Self {
            self.replies.insert(stage, Ok(text.to_string()));
            self
        }

        fn fail(mut self, stage: ReportStage) -> Self {
            self.replies.insert(
                stage,
                Err(Error::transient("service unavailable", ErrorContext::new())),
            );
            self
        }

        fn calls(&self) -> Vec<ReportStage> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReportAgent for ScriptedAgent {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.calls.lock().unwrap().push(request.stage);
            match self.replies.get(&request.stage) {
                Some(Ok(text)) => Ok(text.clone()),
                _ => Err(Error::transient("service unavailable", ErrorContext::new())),
            }
        }
    }

    struct FixedModel;

    #[async_trait]
    impl SentimentService for FixedModel {
        async fn predict(&self, _text: &str) -> Result<SentimentResult> {
            SentimentResult::from_probabilities(&[0.0, 0.0, 0.0, 0.0, 1.0])
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new("Not a diagnosis.").with_retry_timing(&RetryPolicy::immediate(1))
    }

    #[test]
    fn test_state_sequence() {
        let mut state = PipelineState::Aggregating;
        let mut seen = vec![state];
        while state != PipelineState::Done {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                PipelineState::Aggregating,
                PipelineState::GeneratingDoctorReport,
                PipelineState::GeneratingSummary,
                PipelineState::GeneratingEmail,
                PipelineState::Done,
            ]
        );
        assert_eq!(PipelineState::Done.next(), PipelineState::Done);
        assert_eq!(PipelineState::Aggregating.stage(), None);
    }

    #[test]
    fn test_builder_requires_collaborators() {
        let err = Orchestrator::builder(config()).agent(OfflineAgent).build().err().unwrap();
        assert!(err.is_configuration());
        let err = Orchestrator::builder(config()).transcriber(NoAudio).build().err().unwrap();
        assert!(err.is_configuration());
        let err = Orchestrator::builder(PipelineConfig::new(" "))
            .transcriber(NoAudio)
            .agent(OfflineAgent)
            .build()
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_all_stages_live() {
        let agent = Arc::new(
            ScriptedAgent::default()
                .reply(ReportStage::DoctorReport, "REPORT")
                .reply(ReportStage::Summary, "SUMMARY")
                .reply(ReportStage::Email, "EMAIL"),
        );
        let orch = Orchestrator::builder(config())
            .transcriber(NoAudio)
            .agent(agent.clone())
            .build()
            .unwrap();
        let result = orch.run(AssessmentRequest::new(GameScores::new(10, 30, 1))).await.unwrap();

        assert!(!result.fallback_mode());
        assert_eq!(result.ai_service_status(), AiServiceStatus::Available);
        assert_eq!(result.doctor_report(), "REPORT");
        assert_eq!(result.summary(), "SUMMARY");
        assert_eq!(result.email(), "EMAIL");
        assert_eq!(agent.calls(), ReportStage::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_degraded_stage_skips_downstream_agents() {
        let agent = Arc::new(
            ScriptedAgent::default()
                .reply(ReportStage::DoctorReport, "REPORT")
                .fail(ReportStage::Summary)
                .reply(ReportStage::Email, "EMAIL"),
        );
        let orch = Orchestrator::builder(config())
            .transcriber(NoAudio)
            .agent(agent.clone())
            .build()
            .unwrap();
        let result = orch.run(AssessmentRequest::new(GameScores::new(10, 30, 1))).await.unwrap();

        assert!(result.fallback_mode());
        assert_eq!(result.doctor_report(), "REPORT");
        let expected = FallbackContentGenerator::email(result.scores(), result.risk(), "Not a diagnosis.");
        assert_eq!(result.email(), expected);
        assert_eq!(agent.calls(), vec![ReportStage::DoctorReport, ReportStage::Summary]);
    }

    #[tokio::test]
    async fn test_blank_reply_degrades() {
        let agent = ScriptedAgent::default().reply(ReportStage::DoctorReport, "   \n");
        let orch = Orchestrator::builder(config())
            .transcriber(NoAudio)
            .agent(agent)
            .build()
            .unwrap();
        let result = orch.run(AssessmentRequest::default()).await.unwrap();
        assert!(result.fallback_mode());
        assert_eq!(
            result.doctor_report(),
            FallbackContentGenerator::doctor_report(result.scores(), result.risk(), "Not a diagnosis.")
        );
    }

    #[tokio::test]
    async fn test_sentiment_selection() {
        struct OneFile;

        #[async_trait]
        impl TranscriptionService for OneFile {
            async fn transcribe(&self, _source: &str) -> Result<Transcript> {
                Ok(Transcript::new("the weather is ordinary", vec![]))
            }
        }

        let orch = Orchestrator::builder(config())
            .transcriber(OneFile)
            .sentiment_model(FixedModel)
            .agent(OfflineAgent)
            .build()
            .unwrap();
        let request = AssessmentRequest::new(GameScores::default()).with_audio_sources(vec!["a".into()]);

        let live = orch.run(request.clone()).await.unwrap();
        assert_eq!(live.scores().sentiment[0].label, SentimentLabel::VeryPositive);

        let offline = orch
            .run(request.with_sentiment(SentimentSettings { offline: true }))
            .await
            .unwrap();
        assert_eq!(offline.scores().sentiment[0].label, SentimentLabel::Neutral);
        assert!(offline.scores().sentiment[0].is_heuristic());
    }
}
