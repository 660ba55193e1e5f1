//! 情感模块：情感服务边界与基于关键词的规则回退。
//!
//! # Sentiment
//!
//! The five-class sentiment model is an external collaborator behind
//! [`SentimentService`]. When it is unavailable (offline mode, missing
//! weights) the pipeline uses [`KeywordSentiment`], which yields a coarse
//! label and a fixed-style score. A heuristic result is a valid result, not
//! a failure.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SentimentService`] | `predict(text) -> SentimentResult` boundary |
//! | [`KeywordSentiment`] | Rule-based positive/negative keyword counter |
//! | [`DegradingSentiment`] | Model first, keyword heuristic when the model errors |
//! | [`SentimentSettings`] | Per-request selection of the service |

mod keyword;

pub use keyword::KeywordSentiment;

use crate::types::SentimentResult;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn predict(&self, text: &str) -> Result<SentimentResult>;
}

#[async_trait]
impl<T: SentimentService + ?Sized> SentimentService for Arc<T> {
    async fn predict(&self, text: &str) -> Result<SentimentResult> {
        (**self).predict(text).await
    }
}

/// Sentiment options carried by an assessment request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSettings {
    /// Skip the model entirely and use the keyword heuristic.
    #[serde(default)]
    pub offline: bool,
}

/// Wraps a model-backed service and degrades to the keyword heuristic per
/// call when the model fails.
pub struct DegradingSentiment {
    primary: Arc<dyn SentimentService>,
    heuristic: KeywordSentiment,
}

impl DegradingSentiment {
    pub fn new(primary: Arc<dyn SentimentService>) -> Self {
        Self {
            primary,
            heuristic: KeywordSentiment::default(),
        }
    }
}

#[async_trait]
impl SentimentService for DegradingSentiment {
    async fn predict(&self, text: &str) -> Result<SentimentResult> {
        match self.primary.predict(text).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment model failed; using keyword heuristic");
                self.heuristic.predict(text).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;
    use crate::{Error, ErrorContext};

    struct BrokenModel;

    #[async_trait]
    impl SentimentService for BrokenModel {
        async fn predict(&self, _text: &str) -> Result<SentimentResult> {
            Err(Error::validation_with_context(
                "weights not found",
                ErrorContext::new().with_source("sentiment_model"),
            ))
        }
    }

    #[tokio::test]
    async fn test_degrades_to_keywords() {
        let svc = DegradingSentiment::new(Arc::new(BrokenModel));
        let r = svc.predict("I feel great today").await.unwrap();
        assert_eq!(r.label, SentimentLabel::Positive);
        assert!(r.is_heuristic());
    }
}
