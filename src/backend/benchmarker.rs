use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::{describe_duration, BenchConfig};
use crate::error::Error;
use crate::memory::MemorySampler;
use crate::process::{CommandRunner, CommandSpec};
use crate::result::{
    BenchmarkFailure, BenchmarkResult, BenchmarkSuccess, DiagnosticKey, FailureKind,
};
use super::descriptor::BackendDescriptor;
use super::timing::parse_load_duration;

/// One model/prompt pair to run against one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRequest {
    pub model: String,
    pub prompt: String,
}

impl BenchmarkRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

type Step<T> = std::result::Result<T, BenchmarkFailure>;

/// Drives the gate → list/pull → dependency → timed run sequence for any backend
pub struct Benchmarker<'a> {
    runner: &'a dyn CommandRunner,
    sampler: &'a dyn MemorySampler,
    config: &'a BenchConfig,
    arch: String,
    work_dir: PathBuf,
}

impl<'a> Benchmarker<'a> {
    /// Uses the host architecture and the current directory.
    pub fn new(
        runner: &'a dyn CommandRunner,
        sampler: &'a dyn MemorySampler,
        config: &'a BenchConfig,
    ) -> Self {
        Self {
            runner,
            sampler,
            config,
            arch: std::env::consts::ARCH.to_string(),
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl AsRef<Path>) -> Self {
        self.work_dir = work_dir.as_ref().to_path_buf();
        self
    }

    /// Run the full protocol; every failure is captured in the result.
    pub fn benchmark(&self, backend: &BackendDescriptor, request: &BenchmarkRequest) -> BenchmarkResult {
        info!("Benchmarking {} with model {}", backend.label(), request.model);
        match self.try_benchmark(backend, request) {
            Ok(success) => success.into(),
            Err(failure) => {
                warn!("{} benchmark failed: {}", backend.label(), failure.error);
                failure.into()
            }
        }
    }

    fn try_benchmark(&self, backend: &BackendDescriptor, request: &BenchmarkRequest) -> Step<BenchmarkSuccess> {
        if !backend.platform_supported(&self.arch) {
            return Err(backend.platform_failure(&self.arch));
        }
        self.ensure_model(backend, &request.model)?;
        self.check_dependency(backend)?;
        self.run_inference(backend, request)
    }

    fn ensure_model(&self, backend: &BackendDescriptor, model: &str) -> Step<()> {
        let list = backend
            .list_command()
            .with_timeout(self.config.tool_check_timeout())
            .checked();

        let listing = match self.runner.run(&list) {
            Ok(output) => output.stdout,
            Err(Error::ToolMissing { .. }) => return Err(backend.missing_tool_failure(&self.work_dir)),
            Err(err @ Error::ToolFailed { .. }) => {
                return Err(BenchmarkFailure::from_error(&err)
                    .with(DiagnosticKey::DebugCmd, list.to_string())
                    .with(DiagnosticKey::Suggestion, backend.list_failure_suggestion())
                    .with_message(format!("Failed to list {} models: {}", backend.label(), err)));
            }
            Err(err) => return Err(BenchmarkFailure::from_error(&err)),
        };

        // Substring match: listings decorate names with tags, sizes and dates.
        if listing.contains(model) {
            debug!("{} already has {}", backend.label(), model);
            return Ok(());
        }

        if self.config.skip_pull {
            return Err(BenchmarkFailure::new(
                FailureKind::ModelMissing,
                format!("Model {} not found and --skip-pull was specified", model),
            ));
        }

        info!("Model {} not found in {} cache, pulling", model, backend.label());
        let pull = backend.pull_command(model).with_timeout(self.config.pull_timeout());
        match self.runner.run(&pull) {
            Ok(output) if output.success() => {
                info!("Pulled {}", model);
                Ok(())
            }
            Ok(output) => Err(BenchmarkFailure::new(
                FailureKind::PullFailed,
                format!("Failed to pull model {} (exit code: {})", model, output.exit_code),
            )
            .with(DiagnosticKey::Suggestion, "Check if model name is correct or network connection")
            .with(DiagnosticKey::Stderr, output.stderr)),
            Err(Error::Timeout { timeout, .. }) => Err(BenchmarkFailure::new(
                FailureKind::PullFailed,
                format!("Model pull timed out after {}", describe_duration(timeout)),
            )
            .with(DiagnosticKey::Suggestion, "Try a smaller model or check your internet connection")),
            Err(err) => Err(BenchmarkFailure::new(
                FailureKind::PullFailed,
                Error::PullFailed {
                    model: model.to_string(),
                    reason: err.to_string(),
                }
                .to_string(),
            )),
        }
    }

    fn check_dependency(&self, backend: &BackendDescriptor) -> Step<()> {
        let Some(dependency) = &backend.dependency else {
            return Ok(());
        };
        let probe = match CommandSpec::from_argv(&dependency.argv) {
            Ok(spec) => spec.with_timeout(self.config.tool_check_timeout()).checked(),
            Err(err) => return Err(BenchmarkFailure::from_error(&err)),
        };

        let failure = |message: &str| {
            BenchmarkFailure::from_error(&Error::DependencyMissing(message.to_string()))
                .with_message(message)
                .with(DiagnosticKey::Suggestion, dependency.suggestion.clone())
        };

        match self.runner.run(&probe) {
            Ok(output) if output.stdout.contains(&dependency.marker) => Ok(()),
            Ok(_) => Err(failure("MLX framework not properly installed")),
            Err(Error::ToolFailed { stderr, .. }) => {
                Err(failure("MLX framework missing or broken").with(DiagnosticKey::Detail, stderr))
            }
            Err(Error::ToolMissing { tool }) => Err(failure(&format!(
                "{} not found; cannot verify MLX framework",
                tool
            ))),
            Err(err) => Err(BenchmarkFailure::from_error(&err)),
        }
    }

    fn run_inference(&self, backend: &BackendDescriptor, request: &BenchmarkRequest) -> Step<BenchmarkSuccess> {
        let timeout = self.config.inference_timeout();
        let run = backend
            .run_command(&request.model, &request.prompt)
            .with_timeout(timeout)
            .checked();

        let memory_before = self.sampler.resident_mb();
        let start = Instant::now();
        let outcome = self.runner.run(&run);
        let total_time = start.elapsed().as_secs_f64();
        let memory_after = self.sampler.resident_mb();

        let output = match outcome {
            Ok(output) => output,
            Err(Error::Timeout { .. }) => {
                return Err(BenchmarkFailure::new(
                    FailureKind::Timeout,
                    format!("{} inference timed out after {}", backend.label(), describe_duration(timeout)),
                ));
            }
            Err(Error::ToolMissing { .. }) => return Err(backend.missing_tool_failure(&self.work_dir)),
            Err(err @ Error::ToolFailed { .. }) => {
                let reason = err.stderr().map(str::trim).unwrap_or("").to_string();
                let reason = if reason.is_empty() { err.to_string() } else { reason };
                return Err(BenchmarkFailure::from_error(&err)
                    .with(DiagnosticKey::DebugCmd, run.to_string())
                    .with_message(format!("{} inference failed: {}", backend.label(), reason)));
            }
            Err(err) => return Err(BenchmarkFailure::from_error(&err)),
        };

        let mut success = BenchmarkSuccess::from_measurement(&output.stdout, total_time, memory_before, memory_after);
        if backend.reports_load_time {
            if let Some(load) = parse_load_duration(&output.stderr) {
                success = success.with_phases(load, (total_time - load).max(0.0));
            }
        }
        debug!(
            "{}: {} tokens in {:.2}s",
            backend.label(),
            success.estimated_tokens,
            success.total_time
        );
        Ok(success)
    }
}
