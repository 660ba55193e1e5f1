//! 报告生成代理模块：代理边界、提示词构建与 HTTP 代理实现。
//!
//! # Report Agents
//!
//! Drafting report prose is delegated to an external language-model agent
//! behind [`ReportAgent`]. Agents may fail transiently (rate limits, network);
//! those errors are retried by the stage runner. An empty reply is not an
//! agent error; the orchestrator detects it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ReportStage`] | The three generation stages |
//! | [`GenerationRequest`] | Stage plus rendered prompt |
//! | [`PromptBuilder`] | Prompt templates for each stage |
//! | [`HttpReportAgent`] | OpenAI-compatible chat-completions client |
//! | [`OfflineAgent`] | Always unavailable; forces template fallback |

mod http;
mod prompt;

pub use http::{HttpReportAgent, HttpReportAgentBuilder};
pub use prompt::PromptBuilder;

use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    DoctorReport,
    Summary,
    Email,
}

impl ReportStage {
    pub const ALL: [ReportStage; 3] = [
        ReportStage::DoctorReport,
        ReportStage::Summary,
        ReportStage::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStage::DoctorReport => "doctor_report",
            ReportStage::Summary => "summary",
            ReportStage::Email => "email",
        }
    }
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub stage: ReportStage,
    pub prompt: String,
}

#[async_trait]
pub trait ReportAgent: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[async_trait]
impl<T: ReportAgent + ?Sized> ReportAgent for Arc<T> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        (**self).generate(request).await
    }
}

/// Agent for runs without AI services; every stage falls back to templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAgent;

#[async_trait]
impl ReportAgent for OfflineAgent {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        Err(Error::permanent(
            "report agent is offline",
            ErrorContext::new()
                .with_field_path(request.stage.as_str())
                .with_source("offline_agent"),
        ))
    }
}
