//! 类型模块：转录、情感结果、评分包与流水线结果。
//!
//! # Types Module
//!
//! Strongly-typed records flowing through the pipeline. Everything here is
//! serde-serializable so the final [`PipelineResult`] can be emitted as JSON.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Transcript`] | Text plus timestamped segments for one audio source |
//! | [`SentimentResult`] | Five-class label, probabilities and weighted score |
//! | [`GameScores`] | The three game scores of an assessment |
//! | [`ScoreBundle`] | Per-source and combined analytics for one run |
//! | [`PipelineResult`] | Bundle, risk and the three documents of one run |

mod bundle;
mod result;
mod sentiment;
mod transcript;

pub use bundle::{GameScores, ScoreBundle};
pub use result::{AiServiceStatus, PipelineResult};
pub use sentiment::{SentimentLabel, SentimentResult, CLASS_WEIGHTS};
pub use transcript::{Segment, Transcript};
