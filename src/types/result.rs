//! Final pipeline output.

use super::ScoreBundle;
use crate::risk::RiskAssessment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiServiceStatus {
    Available,
    Unavailable,
}

/// Everything one run produced. Built once by the orchestrator and never
/// mutated afterwards; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    run_id: Uuid,
    scores: ScoreBundle,
    risk: RiskAssessment,
    doctor_report: String,
    summary: String,
    email: String,
    fallback_mode: bool,
    ai_service_status: AiServiceStatus,
}

impl PipelineResult {
    pub(crate) fn new(
        scores: ScoreBundle,
        risk: RiskAssessment,
        doctor_report: String,
        summary: String,
        email: String,
        fallback_mode: bool,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scores,
            risk,
            doctor_report,
            summary,
            email,
            fallback_mode,
            ai_service_status: if fallback_mode {
                AiServiceStatus::Unavailable
            } else {
                AiServiceStatus::Available
            },
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn scores(&self) -> &ScoreBundle {
        &self.scores
    }

    pub fn risk(&self) -> &RiskAssessment {
        &self.risk
    }

    pub fn doctor_report(&self) -> &str {
        &self.doctor_report
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn fallback_mode(&self) -> bool {
        self.fallback_mode
    }

    pub fn ai_service_status(&self) -> AiServiceStatus {
        self.ai_service_status
    }
}
