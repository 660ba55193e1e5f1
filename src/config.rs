//! Pipeline configuration.
//!
//! Agent definitions and the disclaimer come from a YAML file shaped like:
//!
//! ```yaml
//! disclaimer_line: "This report is for informational purposes only and is not a diagnosis."
//! clinical_evaluator:
//!   role: Clinical cognitive evaluator
//!   goal: Write a structured cognitive screening report
//!   backstory: You interpret screening metrics conservatively.
//!   llm: gpt-4o-mini
//! summary_analyst: { ... }
//! email_composer: { ... }
//! ```
//!
//! The loaded values are wrapped in an immutable [`PipelineConfig`] that is
//! passed to the orchestrator explicitly.

use crate::aggregate::DEFAULT_CONCURRENCY;
use crate::agent::ReportStage;
use crate::resilience::RetryPolicy;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One report-generation agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub role: String,
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
    /// Model identifier passed to the agent backend.
    pub llm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub disclaimer_line: String,
    #[serde(default)]
    pub clinical_evaluator: Option<AgentSpec>,
    #[serde(default)]
    pub summary_analyst: Option<AgentSpec>,
    #[serde(default)]
    pub email_composer: Option<AgentSpec>,
}

impl AgentsConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read agents config: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        let agents = Self::from_yaml_str(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid agents config: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        tracing::info!(path = %path.display(), "loaded agents config");
        Ok(agents)
    }

    pub fn agent_for(&self, stage: ReportStage) -> Option<&AgentSpec> {
        match stage {
            ReportStage::DoctorReport => self.clinical_evaluator.as_ref(),
            ReportStage::Summary => self.summary_analyst.as_ref(),
            ReportStage::Email => self.email_composer.as_ref(),
        }
    }
}

/// Immutable per-process configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub disclaimer: String,
    #[serde(default)]
    pub agents: AgentsConfig,
    pub doctor_report_retry: RetryPolicy,
    pub summary_retry: RetryPolicy,
    pub email_retry: RetryPolicy,
    /// Audio sources processed at once during aggregation.
    pub concurrency: usize,
}

impl PipelineConfig {
    pub const DOCTOR_REPORT_ATTEMPTS: u32 = 3;
    pub const SUMMARY_ATTEMPTS: u32 = 2;
    pub const EMAIL_ATTEMPTS: u32 = 2;

    pub fn new(disclaimer: impl Into<String>) -> Self {
        Self {
            disclaimer: disclaimer.into(),
            agents: AgentsConfig::default(),
            doctor_report_retry: RetryPolicy::new(Self::DOCTOR_REPORT_ATTEMPTS),
            summary_retry: RetryPolicy::new(Self::SUMMARY_ATTEMPTS),
            email_retry: RetryPolicy::new(Self::EMAIL_ATTEMPTS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Take the disclaimer from the agents file.
    pub fn from_agents(agents: AgentsConfig) -> Self {
        let mut cfg = Self::new(agents.disclaimer_line.clone());
        cfg.agents = agents;
        cfg
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Apply one policy shape to all stages, keeping each stage's attempt budget.
    pub fn with_retry_timing(mut self, template: &RetryPolicy) -> Self {
        for policy in [
            &mut self.doctor_report_retry,
            &mut self.summary_retry,
            &mut self.email_retry,
        ] {
            policy.base_delay = template.base_delay;
            policy.max_delay = template.max_delay;
            policy.jitter = template.jitter;
        }
        self
    }

    pub fn with_retry(mut self, stage: ReportStage, policy: RetryPolicy) -> Self {
        match stage {
            ReportStage::DoctorReport => self.doctor_report_retry = policy,
            ReportStage::Summary => self.summary_retry = policy,
            ReportStage::Email => self.email_retry = policy,
        }
        self
    }

    pub fn retry_for(&self, stage: ReportStage) -> &RetryPolicy {
        match stage {
            ReportStage::DoctorReport => &self.doctor_report_retry,
            ReportStage::Summary => &self.summary_retry,
            ReportStage::Email => &self.email_retry,
        }
    }

    /// Fatal configuration problems; checked before any stage runs.
    pub fn validate(&self) -> Result<()> {
        if self.disclaimer.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "disclaimer text is required",
                ErrorContext::new()
                    .with_field_path("disclaimer_line")
                    .with_source("config"),
            ));
        }
        for stage in ReportStage::ALL {
            if self.retry_for(stage).max_attempts == 0 {
                return Err(Error::configuration_with_context(
                    "retry policy must allow at least one attempt",
                    ErrorContext::new()
                        .with_field_path(format!("{}.max_attempts", stage.as_str()))
                        .with_source("config"),
                ));
            }
        }
        if self.concurrency == 0 {
            return Err(Error::configuration_with_context(
                "aggregation concurrency must be at least 1",
                ErrorContext::new()
                    .with_field_path("concurrency")
                    .with_source("config"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
disclaimer_line: "Not a diagnosis."
clinical_evaluator:
  role: Clinical evaluator
  goal: Write the report
  backstory: Careful and conservative.
  llm: gpt-4o-mini
summary_analyst:
  role: Summary analyst
  goal: Summarize
  llm: gpt-4o-mini
"#;

    #[test]
    fn test_parse_agents_yaml() {
        let agents = AgentsConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(agents.disclaimer_line, "Not a diagnosis.");
        assert_eq!(
            agents.agent_for(ReportStage::DoctorReport).unwrap().llm,
            "gpt-4o-mini"
        );
        assert_eq!(agents.agent_for(ReportStage::Summary).unwrap().backstory, "");
        assert!(agents.agent_for(ReportStage::Email).is_none());
    }

    #[test]
    fn test_defaults_follow_stage_budgets() {
        let cfg = PipelineConfig::from_agents(AgentsConfig::from_yaml_str(SAMPLE).unwrap());
        assert_eq!(cfg.disclaimer, "Not a diagnosis.");
        assert_eq!(cfg.retry_for(ReportStage::DoctorReport).max_attempts, 3);
        assert_eq!(cfg.retry_for(ReportStage::Summary).max_attempts, 2);
        assert_eq!(cfg.retry_for(ReportStage::Email).max_attempts, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_missing_disclaimer_is_fatal() {
        let cfg = PipelineConfig::from_agents(AgentsConfig::default());
        let err = cfg.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("disclaimer_line"));
    }

    #[test]
    fn test_zero_attempts_or_concurrency_is_fatal() {
        let cfg = PipelineConfig::new("x").with_retry(ReportStage::Email, RetryPolicy::immediate(0));
        assert!(cfg.validate().unwrap_err().is_configuration());
        let cfg = PipelineConfig::new("x").with_concurrency(0);
        assert!(cfg.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_retry_timing_keeps_budgets() {
        let cfg = PipelineConfig::new("x").with_retry_timing(&RetryPolicy::immediate(9));
        let p = cfg.retry_for(ReportStage::DoctorReport);
        assert_eq!(p.max_attempts, 3);
        assert!(!p.jitter);
        assert_eq!(p.base_delay, std::time::Duration::ZERO);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_configuration_error() {
        let err = AgentsConfig::load("/no/such/agents.yaml").await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.yaml");
        std::fs::write(&path, "clinical_evaluator: [unterminated").unwrap();
        let err = AgentsConfig::load(&path).await.unwrap_err();
        assert!(err.is_configuration());

        std::fs::write(&path, SAMPLE).unwrap();
        let agents = AgentsConfig::load(&path).await.unwrap();
        assert_eq!(agents.disclaimer_line, "Not a diagnosis.");
    }
}
