//! Retry-with-backoff stage runner.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Configuration for retry logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    #[serde(with = "secs_f64")]
    pub base_delay: Duration,
    #[serde(with = "secs_f64")]
    pub max_delay: Duration,
    /// Add a uniform `[0, 1)` second jitter to each delay.
    pub jitter: bool,
}

impl RetryPolicy {
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            jitter: true,
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry `attempt` (0-based) for a given jitter sample in seconds.
    pub fn backoff(&self, attempt: u32, jitter_secs: f64) -> Duration {
        let factor = 2f64.powi(attempt.min(62) as i32);
        let delay = self.base_delay.as_secs_f64() * factor + jitter_secs;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()).max(0.0))
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let jitter = if self.jitter { rand::random::<f64>() } else { 0.0 };
        self.backoff(attempt, jitter)
    }
}

/// Why a stage produced no usable content.
#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    #[error("stage failed after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: Error },

    #[error("stage failed with a non-retryable error: {last_error}")]
    Rejected { last_error: Error },

    #[error("stage returned empty output")]
    Empty,

    #[error("stage skipped because an upstream stage degraded")]
    Skipped,
}

/// Executes one named stage under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct StageRunner {
    stage: &'static str,
    policy: RetryPolicy,
}

impl StageRunner {
    pub fn new(stage: &'static str, policy: RetryPolicy) -> Self {
        Self { stage, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. Success values are returned as-is; judging
    /// them (e.g. empty output) is up to the caller.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, StageFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = crate::Result<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(stage = self.stage, attempt = attempt + 1, "stage succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::warn!(stage = self.stage, error = %truncate(&e.to_string(), 100), "stage failed permanently");
                    return Err(StageFailure::Rejected { last_error: e });
                }
                Err(e) => {
                    if attempt + 1 >= max_attempts {
                        tracing::warn!(
                            stage = self.stage,
                            attempts = attempt + 1,
                            error = %truncate(&e.to_string(), 100),
                            "stage retries exhausted"
                        );
                        return Err(StageFailure::Exhausted {
                            attempts: attempt + 1,
                            last_error: e,
                        });
                    }
                    let delay = self.policy.next_delay(attempt);
                    tracing::warn!(
                        stage = self.stage,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs_f64(),
                        error = %truncate(&e.to_string(), 100),
                        "attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

mod secs_f64 {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("delay must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
