//! Aggregation over Whisper JSON transcripts on disk.

use cogscreen::aggregate::Aggregator;
use cogscreen::sentiment::KeywordSentiment;
use cogscreen::stt::WhisperJsonTranscriber;
use cogscreen::{GameScores, SentimentLabel, SentimentResult, SpeechMetrics};
use std::path::Path;
use std::sync::Arc;

fn write_recording(dir: &Path, name: &str, text: &str) -> String {
    let audio = dir.join(name);
    std::fs::write(&audio, b"RIFF....WAVE").unwrap();
    let transcript = serde_json::json!({
        "text": format!(" {text} "),
        "language": "en",
        "segments": [
            {"id": 0, "start": 0.0, "end": 1.4, "text": text, "avg_logprob": -0.2}
        ]
    });
    std::fs::write(
        dir.join(format!("{name}.json")),
        serde_json::to_vec(&transcript).unwrap(),
    )
    .unwrap();
    audio.to_string_lossy().into_owned()
}

fn aggregator() -> Aggregator {
    Aggregator::new(Arc::new(WhisperJsonTranscriber::new()))
}

#[tokio::test]
async fn test_missing_source_keeps_its_slot() {
    let dir = tempfile::tempdir().unwrap();
    let present = write_recording(dir.path(), "q1.wav", "I feel great today");
    let missing = dir.path().join("q2.wav").to_string_lossy().into_owned();

    let bundle = aggregator()
        .aggregate(
            GameScores::new(10, 30, 1),
            &[present, missing],
            &KeywordSentiment::default(),
        )
        .await;

    assert!(bundle.is_consistent());
    assert_eq!(bundle.audio_files_count(), 2);
    assert_eq!(bundle.transcribed_count(), 1);

    assert_eq!(bundle.transcriptions[0].text.trim(), "I feel great today");
    assert!(!bundle.speech_metrics[0].is_zero());
    assert_eq!(bundle.sentiment[0].label, SentimentLabel::Positive);

    assert!(bundle.transcriptions[1].is_empty());
    assert_eq!(bundle.speech_metrics[1], SpeechMetrics::default());
    assert_eq!(bundle.sentiment[1], SentimentResult::empty());

    assert_eq!(bundle.transcribed_text, "I feel great today");
    assert_eq!(bundle.combined_sentiment.label, SentimentLabel::Positive);
}

#[tokio::test]
async fn test_corrupt_transcript_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_recording(dir.path(), "a.wav", "hello there");
    let broken = dir.path().join("b.wav");
    std::fs::write(&broken, b"RIFF").unwrap();
    std::fs::write(dir.path().join("b.wav.json"), b"{not json").unwrap();
    let third = write_recording(dir.path(), "c.wav", "good morning");

    let bundle = aggregator()
        .with_concurrency(3)
        .aggregate(
            GameScores::default(),
            &[first, broken.to_string_lossy().into_owned(), third],
            &KeywordSentiment::default(),
        )
        .await;

    assert_eq!(bundle.audio_files_count(), 3);
    assert_eq!(bundle.transcriptions[0].text.trim(), "hello there");
    assert!(bundle.transcriptions[1].is_empty());
    assert_eq!(bundle.transcriptions[2].text.trim(), "good morning");
    assert_eq!(bundle.transcribed_text, "hello there good morning");
}

#[tokio::test]
async fn test_sidecar_next_to_stem_and_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("q3.webm"), b"webm").unwrap();
    std::fs::write(
        dir.path().join("q3.json"),
        br#"{"text": "the cat sat", "segments": []}"#,
    )
    .unwrap();

    let agg = Aggregator::new(Arc::new(
        WhisperJsonTranscriber::new().with_base_dir(dir.path()),
    ));
    let bundle = agg
        .aggregate(GameScores::default(), &["q3.webm".to_string()], &KeywordSentiment::default())
        .await;

    assert_eq!(bundle.transcribed_text, "the cat sat");
    // no segments: timing metrics stay zero, lexical ones do not
    assert_eq!(bundle.speech_metrics[0].total_time, 0.0);
    assert_eq!(bundle.speech_metrics[0].lexical_diversity, 100.0);
}

#[tokio::test]
async fn test_only_blank_sources_gives_placeholder() {
    let bundle = aggregator()
        .aggregate(
            GameScores::new(10, 30, 1),
            &["".to_string(), "   ".to_string()],
            &KeywordSentiment::default(),
        )
        .await;
    assert_eq!(bundle.audio_files_count(), 1);
    assert!(bundle.speech_metrics[0].is_zero());
    assert_eq!(bundle.transcribed_text, "");
}
