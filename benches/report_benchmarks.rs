use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use llm_bench::{
    compare, render_report,
    result::{estimate_tokens, BenchmarkFailure, DiagnosticKey, FailureKind},
    BenchmarkResult, BenchmarkSuccess, RunRecord,
};

// =====================================================================
// Fixtures
// =====================================================================

fn response_text(words: usize) -> String {
    (0..words).map(|i| format!("token{}", i)).collect::<Vec<_>>().join(" ")
}

fn sample_success(words: usize, total_time: f64) -> BenchmarkSuccess {
    BenchmarkSuccess::from_measurement(&response_text(words), total_time, 120.0, 184.5)
}

fn sample_failure() -> BenchmarkFailure {
    BenchmarkFailure::new(FailureKind::ToolFailed, "MLX-Knife inference failed")
        .with(DiagnosticKey::Suggestion, "pip install mlx mlx-lm")
        .with(DiagnosticKey::Stderr, "Traceback (most recent call last):\n  ...")
        .with(DiagnosticKey::DebugCmd, "mlxk run model prompt --no-stream")
}

// =====================================================================
// Criterion Benchmark Functions
// =====================================================================

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    for words in [64usize, 1024, 16384] {
        let text = response_text(words);
        group.bench_function(BenchmarkId::new("estimate_tokens", words), |b| {
            b.iter(|| estimate_tokens(black_box(&text)));
        });
    }

    let generic = sample_success(512, 12.5);
    let specialized = sample_success(512, 8.25);
    group.bench_function("compare", |b| {
        b.iter(|| compare(black_box(&generic), black_box(&specialized)));
    });

    let both: (BenchmarkResult, BenchmarkResult) = (generic.clone().into(), specialized.clone().into());
    group.bench_function(BenchmarkId::new("render", "both_succeeded"), |b| {
        b.iter(|| render_report("Ollama", black_box(&both.0), "MLX-Knife", black_box(&both.1)));
    });

    let mixed: (BenchmarkResult, BenchmarkResult) = (generic.clone().into(), sample_failure().into());
    group.bench_function(BenchmarkId::new("render", "one_failed"), |b| {
        b.iter(|| render_report("Ollama", black_box(&mixed.0), "MLX-Knife", black_box(&mixed.1)));
    });

    let record = RunRecord::new("prompt", "qwen2.5-coder:1.5b", "mlx-community/Qwen", both.0, mixed.1);
    group.bench_function("serialize_run_record", |b| {
        b.iter(|| serde_json::to_vec_pretty(black_box(&record)));
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
