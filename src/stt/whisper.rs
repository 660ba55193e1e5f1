//! Loads transcripts that Whisper already wrote to disk.

use super::TranscriptionService;
use crate::types::Transcript;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Resolves an audio source to its Whisper JSON output.
///
/// For `uploads/q1.webm` the candidates are `uploads/q1.webm.json` then
/// `uploads/q1.json`. A source that already ends in `.json` is read directly.
/// The audio file itself must exist unless the source is the JSON file.
#[derive(Debug, Clone, Default)]
pub struct WhisperJsonTranscriber {
    base_dir: Option<PathBuf>,
}

impl WhisperJsonTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against this directory.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let path = PathBuf::from(source);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    fn candidates(audio: &Path) -> Vec<PathBuf> {
        if audio.extension().map_or(false, |e| e == "json") {
            return vec![audio.to_path_buf()];
        }
        let mut appended = audio.as_os_str().to_owned();
        appended.push(".json");
        vec![PathBuf::from(appended), audio.with_extension("json")]
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

#[async_trait]
impl TranscriptionService for WhisperJsonTranscriber {
    async fn transcribe(&self, source: &str) -> Result<Transcript> {
        let audio = self.resolve(source);
        let candidates = Self::candidates(&audio);
        let is_json_source = candidates.len() == 1;

        if !is_json_source && !exists(&audio).await {
            return Err(Error::source_unavailable(source, "audio file not found"));
        }

        for candidate in &candidates {
            if !exists(candidate).await {
                continue;
            }
            let raw = tokio::fs::read_to_string(candidate).await.map_err(|e| {
                Error::source_unavailable(source, format!("{}: {}", candidate.display(), e))
            })?;
            let transcript: Transcript = serde_json::from_str(&raw).map_err(|e| {
                Error::source_unavailable(
                    source,
                    format!("corrupt transcript {}: {}", candidate.display(), e),
                )
            })?;
            tracing::debug!(
                source,
                transcript = %candidate.display(),
                segments = transcript.segments.len(),
                "transcript loaded"
            );
            return Ok(transcript);
        }

        Err(Error::source_unavailable(source, "no transcript found for audio source"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates() {
        let c = WhisperJsonTranscriber::candidates(Path::new("up/q1.webm"));
        assert_eq!(
            c,
            vec![PathBuf::from("up/q1.webm.json"), PathBuf::from("up/q1.json")]
        );
        let c = WhisperJsonTranscriber::candidates(Path::new("up/q1.json"));
        assert_eq!(c, vec![PathBuf::from("up/q1.json")]);
    }

    #[tokio::test]
    async fn test_missing_audio_is_source_unavailable() {
        let t = WhisperJsonTranscriber::new();
        let err = t.transcribe("/definitely/not/here.webm").await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }
}
