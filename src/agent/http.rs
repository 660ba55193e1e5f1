//! OpenAI-compatible chat-completions report agent.

use super::{GenerationRequest, ReportAgent};
use crate::config::AgentsConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sends each stage prompt to `{base_url}/chat/completions`, using the
/// stage's agent definition for the model and the system message.
pub struct HttpReportAgent {
    http_client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    agents: AgentsConfig,
}

impl std::fmt::Debug for HttpReportAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReportAgent")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("agents", &self.agents)
            .finish_non_exhaustive()
    }
}

impl HttpReportAgent {
    pub fn builder() -> HttpReportAgentBuilder {
        HttpReportAgentBuilder::new()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn system_message(spec: &crate::config::AgentSpec) -> String {
        let mut msg = format!("You are a {}. Your goal: {}.", spec.role, spec.goal);
        if !spec.backstory.trim().is_empty() {
            msg.push(' ');
            msg.push_str(spec.backstory.trim());
        }
        msg
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Transient statuses worth another attempt.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 409 | 429) || (500..=599).contains(&status)
}

#[async_trait]
impl ReportAgent for HttpReportAgent {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let stage = request.stage.as_str();
        let spec = self.agents.agent_for(request.stage).ok_or_else(|| {
            Error::permanent(
                "no agent configured for stage",
                ErrorContext::new()
                    .with_field_path(stage)
                    .with_source("http_agent"),
            )
        })?;

        let body = json!({
            "model": spec.llm,
            "messages": [
                {"role": "system", "content": Self::system_message(spec)},
                {"role": "user", "content": request.prompt},
            ],
        });

        tracing::info!(stage, model = %spec.llm, "running report agent");
        let mut req = self.http_client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(200).collect();
            let ctx = ErrorContext::new()
                .with_field_path(stage)
                .with_details(excerpt)
                .with_source("http_agent");
            let msg = format!("agent API error: HTTP {}", status.as_u16());
            return Err(if is_retryable_status(status.as_u16()) {
                Error::transient(msg, ctx)
            } else {
                Error::permanent(msg, ctx)
            });
        }

        let completion: ChatCompletion = serde_json::from_str(&text)?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

pub struct HttpReportAgentBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    agents: AgentsConfig,
}

impl HttpReportAgentBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            agents: AgentsConfig::default(),
        }
    }

    /// Read `COGSCREEN_AGENT_BASE_URL`, `COGSCREEN_AGENT_API_KEY` and
    /// `COGSCREEN_AGENT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        builder.base_url = env::var("COGSCREEN_AGENT_BASE_URL").ok();
        builder.api_key = env::var("COGSCREEN_AGENT_API_KEY").ok();
        if let Some(secs) = env::var("COGSCREEN_AGENT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder.timeout = Duration::from_secs(secs);
        }
        builder
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn agents(mut self, agents: AgentsConfig) -> Self {
        self.agents = agents;
        self
    }

    pub fn build(self) -> Result<HttpReportAgent> {
        let base = self.base_url.ok_or_else(|| {
            Error::configuration_with_context(
                "agent base URL is required",
                ErrorContext::new()
                    .with_field_path("COGSCREEN_AGENT_BASE_URL")
                    .with_source("http_agent"),
            )
        })?;
        let endpoint = format!("{}/chat/completions", base.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid agent base URL: {}", e),
                ErrorContext::new()
                    .with_details(base.clone())
                    .with_source("http_agent"),
            )
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(HttpReportAgent {
            http_client,
            endpoint,
            api_key: self.api_key,
            agents: self.agents,
        })
    }
}

impl Default for HttpReportAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
