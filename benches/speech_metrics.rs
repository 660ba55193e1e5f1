//! Benchmarks for the deterministic analytics path
//!
//! This benchmark measures:
//! - Speech metrics over short and long transcripts
//! - Risk scoring from computed metrics
//! - Fallback report rendering

use cogscreen::fallback::FallbackContentGenerator;
use cogscreen::{GameScores, RiskScorer, ScoreBundle, Segment, SentimentResult, SpeechMetrics, Transcript};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const SENTENCE: &str = "Um, I think I went to the, uh, the market yesterday and I bought some apples.";

fn transcript(repeats: usize) -> Transcript {
    let mut text = String::new();
    let mut segments = Vec::with_capacity(repeats);
    for i in 0..repeats {
        let start = i as f64 * 1.5;
        segments.push(Segment::new(start, start + 1.2, SENTENCE));
        if i > 0 {
            text.push(' ');
        }
        text.push_str(SENTENCE);
    }
    Transcript::new(text, segments)
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("speech_metrics");

    for repeats in [1usize, 50, 500] {
        let t = transcript(repeats);
        group.throughput(Throughput::Bytes(t.text.len() as u64));
        group.bench_function(format!("compute_{repeats}_sentences"), |b| {
            b.iter(|| SpeechMetrics::compute(black_box(&t)))
        });
    }

    group.finish();
}

fn bench_risk_and_fallback(c: &mut Criterion) {
    let t = transcript(50);
    let metrics = SpeechMetrics::compute(&t);
    let sentiment = SentimentResult::default();
    let scorer = RiskScorer::new();

    c.bench_function("risk_assess", |b| {
        b.iter(|| scorer.assess(black_box(&metrics), black_box(&sentiment)))
    });

    let mut bundle = ScoreBundle::placeholder(GameScores::new(10, 30, 1));
    bundle.speech_metrics = vec![metrics];
    bundle.combined_metrics = metrics;
    bundle.transcribed_text = t.text.clone();
    bundle.transcriptions = vec![t];
    let risk = scorer.assess_bundle(&bundle);

    c.bench_function("fallback_doctor_report", |b| {
        b.iter(|| FallbackContentGenerator::doctor_report(black_box(&bundle), &risk, "Not a diagnosis."))
    });
}

criterion_group!(benches, bench_metrics, bench_risk_and_fallback);
criterion_main!(benches);
