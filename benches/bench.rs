//! Criterion benchmarks for textdirectory.
//!
//! Covers the hot paths of a run:
//! - Spelling correction with and without the cache
//! - Candidate generation
//! - Pipeline application over a batch of documents
//! - Sequence similarity

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use textdirectory::filter::{SequenceMatcher, SimilarityRatio};
use textdirectory::spelling::{FrequencyModel, SpellCorrector, edits1};
use textdirectory::transform::Pipeline;

const WORDS: &[&str] = &[
    "the", "house", "on", "hill", "directory", "text", "filter", "checkpoint", "language",
    "model", "spelling", "correction", "pipeline", "transformation", "document", "corpus",
    "random", "sample", "similar", "outlier",
];

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            (0..50)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn model() -> FrequencyModel {
    let mut model = FrequencyModel::new();
    for (i, word) in WORDS.iter().enumerate() {
        model.add_word(word, (WORDS.len() - i) as u64 * 10);
    }
    model
}

fn bench_spell_correction(c: &mut Criterion) {
    let mut group = c.benchmark_group("spell_correction");
    group.sample_size(20); // Reduce sample size for faster execution

    let misspellings = ["huose", "directroy", "pipelne", "transfromation", "corpsu"];

    group.bench_function("edits1", |b| {
        b.iter(|| black_box(edits1(black_box("transfromation"))))
    });

    let uncached = SpellCorrector::new(model(), false);
    group.throughput(Throughput::Elements(misspellings.len() as u64));
    group.bench_function("correct_batch_uncached", |b| {
        b.iter(|| {
            for word in &misspellings {
                black_box(uncached.correction(black_box(word)));
            }
        })
    });

    let cached = SpellCorrector::new(model(), true);
    group.bench_function("correct_batch_cached", |b| {
        b.iter(|| {
            for word in &misspellings {
                black_box(cached.correction(black_box(word)));
            }
        })
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let texts = generate_test_documents(100);
    let mut pipeline = Pipeline::default();
    pipeline.stage("transformation_uppercase", Vec::new()).unwrap();
    pipeline
        .stage("transformation_replace_digits", vec!["#".to_string()])
        .unwrap();
    pipeline
        .stage("transformation_remove_stopwords", Vec::new())
        .unwrap();

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("apply_batch", |b| {
        b.iter(|| {
            for text in &texts {
                let _ = black_box(pipeline.apply(black_box(text)));
            }
        })
    });

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    group.sample_size(20);

    let texts = generate_test_documents(2);
    let matcher = SequenceMatcher::new();
    group.bench_function("sequence_matcher_ratio", |b| {
        b.iter(|| black_box(matcher.ratio(black_box(&texts[0]), black_box(&texts[1]))))
    });

    group.finish();
}

criterion_group!(benches, bench_spell_correction, bench_pipeline, bench_similarity);
criterion_main!(benches);
