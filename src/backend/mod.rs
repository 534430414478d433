// Backend benchmarking
//
// One parameterised workflow, driven by a per-runner descriptor, produces a
// BenchmarkResult for a model/prompt pair.

mod descriptor;
mod benchmarker;
mod timing;

pub use descriptor::{BackendDescriptor, BackendKind, DependencyCheck, APPLE_SILICON_ARCHES};
pub use benchmarker::{Benchmarker, BenchmarkRequest};
pub use timing::{parse_go_duration, parse_load_duration};
