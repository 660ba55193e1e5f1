//! STT（语音转文字）模块：转录服务边界与 Whisper JSON 转录加载。
//!
//! Speech-to-text itself is an external collaborator. The pipeline only needs
//! `transcribe(source) -> Transcript`, failing with
//! [`Error::SourceUnavailable`](crate::Error::SourceUnavailable) when the
//! source is missing or unreadable.

mod whisper;

pub use whisper::WhisperJsonTranscriber;

use crate::types::Transcript;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, source: &str) -> Result<Transcript>;
}

#[async_trait]
impl<T: TranscriptionService + ?Sized> TranscriptionService for Arc<T> {
    async fn transcribe(&self, source: &str) -> Result<Transcript> {
        (**self).transcribe(source).await
    }
}
