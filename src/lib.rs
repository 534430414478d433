pub mod error;
pub mod config;
pub mod process;
pub mod memory;
pub mod result;
pub mod backend;
pub mod report;
pub mod probe;
pub mod workflow;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::BenchConfig;
pub use process::{CommandRunner, CommandSpec, CommandOutput, SystemRunner};
pub use memory::{MemorySampler, ProcessMemorySampler};
pub use result::{
    BenchmarkResult, BenchmarkSuccess, BenchmarkFailure, FailureKind, DiagnosticKey, RunRecord,
    save_run_record, load_run_record,
};
pub use backend::{BackendDescriptor, BackendKind, Benchmarker, BenchmarkRequest};
pub use report::{compare, render_report, print_report, Comparison, Winner};
pub use probe::{run_diagnostics, render_diagnostics, DiagnosticReport, ProbePlan, ProbeOutcome};
pub use workflow::{run_comparison, ComparisonPlan};
