// Benchmark workflow
//
// Generic backend first, then the specialized one, strictly in sequence.

use crate::backend::{BackendDescriptor, BenchmarkRequest, Benchmarker};
use crate::result::RunRecord;

/// Inputs for one comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPlan {
    pub prompt: String,
    pub ollama_model: String,
    pub mlx_model: String,
}

/// Benchmark both backends and bundle the outcomes.
pub fn run_comparison(
    benchmarker: &Benchmarker<'_>,
    ollama: &BackendDescriptor,
    mlx: &BackendDescriptor,
    plan: &ComparisonPlan,
) -> RunRecord {
    let ollama_result = benchmarker.benchmark(ollama, &BenchmarkRequest::new(&plan.ollama_model, &plan.prompt));
    let mlx_result = benchmarker.benchmark(mlx, &BenchmarkRequest::new(&plan.mlx_model, &plan.prompt));
    RunRecord::new(
        plan.prompt.clone(),
        plan.ollama_model.clone(),
        plan.mlx_model.clone(),
        ollama_result,
        mlx_result,
    )
}

impl RunRecord {
    /// True when either backend failed
    pub fn any_failed(&self) -> bool {
        !self.ollama_result.is_success() || !self.mlx_result.is_success()
    }
}
