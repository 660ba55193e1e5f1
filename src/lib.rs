//! # cogscreen
//!
//! 认知筛查评估的语音分析与弹性报告流水线。
//!
//! Speech analytics and resilient report pipeline for a cognitive-screening
//! assessment.
//!
//! ## Overview
//!
//! The crate ingests raw speech transcripts and game scores and produces
//! derived speech/linguistic metrics, a heuristic cognitive-risk estimate and
//! a three-stage natural-language report (clinical report, summary, email).
//! Report stages are driven through a bounded retry-with-backoff runner and
//! fall back to deterministic templates, so a run always terminates with a
//! complete [`PipelineResult`] and an explicit degraded-mode flag.
//!
//! ## Core Philosophy
//!
//! - **Always Complete**: the orchestrator never surfaces a stage failure; degraded
//!   content is flagged via `fallback_mode` and `ai_service_status`
//! - **Deterministic Core**: metrics, risk and fallback text are pure functions of their inputs
//! - **Explicit Configuration**: no ambient globals; an immutable [`PipelineConfig`] is passed in
//! - **Isolated Sources**: one unreadable audio source never aborts the batch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cogscreen::{AgentsConfig, AssessmentRequest, GameScores, Orchestrator, PipelineConfig};
//! use cogscreen::agent::OfflineAgent;
//! use cogscreen::stt::WhisperJsonTranscriber;
//!
//! #[tokio::main]
//! async fn main() -> cogscreen::Result<()> {
//!     let agents = AgentsConfig::load("agents.yaml").await?;
//!     let orchestrator = Orchestrator::builder(PipelineConfig::from_agents(agents))
//!         .transcriber(WhisperJsonTranscriber::new())
//!         .agent(OfflineAgent)
//!         .build()?;
//!
//!     let request = AssessmentRequest::new(GameScores::new(10, 30, 1))
//!         .with_audio_sources(vec!["uploads/audio_q1.webm".to_string()]);
//!     let result = orchestrator.run(request).await?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Transcripts, sentiment results, score bundles and the pipeline result |
//! | [`metrics`] | Deterministic speech/linguistic metrics for one transcript |
//! | [`risk`] | Heuristic risk probability and category |
//! | [`sentiment`] | Sentiment service boundary and the keyword heuristic |
//! | [`stt`] | Transcription service boundary and Whisper JSON loading |
//! | [`aggregate`] | Per-source aggregation into a [`ScoreBundle`] |
//! | [`resilience`] | Retry-with-backoff stage runner |
//! | [`fallback`] | Templated report/summary/email content |
//! | [`agent`] | Report-generation agent boundary, prompts and HTTP agent |
//! | [`config`] | Agents YAML and pipeline configuration |
//! | [`pipeline`] | The orchestrator state machine |
//! | [`games`] | Memory-game scoring ([`games::recall_score`]) feeding [`GameScores`] |

pub mod agent;
pub mod aggregate;
pub mod config;
pub mod fallback;
pub mod games;
pub mod metrics;
pub mod pipeline;
pub mod resilience;
pub mod risk;
pub mod sentiment;
pub mod stt;
pub mod types;

// Re-export main types for convenience
pub use config::{AgentSpec, AgentsConfig, PipelineConfig};
pub use metrics::SpeechMetrics;
pub use pipeline::{AssessmentRequest, Orchestrator, OrchestratorBuilder, PipelineState};
pub use risk::{RiskAssessment, RiskCategory, RiskScorer};
pub use types::{
    AiServiceStatus, GameScores, PipelineResult, ScoreBundle, Segment, SentimentLabel,
    SentimentResult, Transcript,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
