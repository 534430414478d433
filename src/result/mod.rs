// Benchmark results
//
// Outcome types for a single backend run, the per-invocation run record,
// and its JSON persistence.

mod types;
mod export;

pub use types::{
    BenchmarkResult, BenchmarkSuccess, BenchmarkFailure, FailureKind,
    DiagnosticKey, SuccessFlag, RunRecord,
    estimate_tokens, tokens_per_second,
};
pub use export::{save_run_record, load_run_record, DEFAULT_OUTPUT_FILE};
