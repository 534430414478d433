// Types module for benchmark results

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter};

use crate::error::Error;

/// Estimated token count: the number of whitespace-delimited words.
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Token throughput; 0.0 whenever the elapsed time is not strictly positive.
pub fn tokens_per_second(tokens: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 && elapsed_secs.is_finite() {
        tokens as f64 / elapsed_secs
    } else {
        0.0
    }
}

/// Serializes as the literal `true`; refuses anything else when parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessFlag;

impl Serialize for SuccessFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for SuccessFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(SuccessFlag)
        } else {
            Err(D::Error::custom("`success` must be true"))
        }
    }
}

/// Measurements from a completed inference run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuccess {
    pub success: SuccessFlag,
    /// Model output, trimmed
    pub response: String,
    /// Wall-clock seconds of the timed interval
    pub total_time: f64,
    /// Seconds spent loading the model, when the backend reports it separately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_load_time: Option<f64>,
    /// Seconds spent generating, when reported separately from loading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_time: Option<f64>,
    pub estimated_tokens: usize,
    pub tokens_per_second: f64,
    /// Resident memory in MB before the run
    pub memory_before: f64,
    /// Resident memory in MB after the run
    pub memory_after: f64,
    pub memory_delta: f64,
}

impl BenchmarkSuccess {
    /// Derive every metric from the raw measurements.
    pub fn from_measurement(
        response: &str,
        total_time: f64,
        memory_before: f64,
        memory_after: f64,
    ) -> Self {
        let response = response.trim().to_string();
        let estimated_tokens = estimate_tokens(&response);
        Self {
            success: SuccessFlag,
            tokens_per_second: tokens_per_second(estimated_tokens, total_time),
            response,
            total_time,
            model_load_time: None,
            inference_time: None,
            estimated_tokens,
            memory_before,
            memory_after,
            memory_delta: memory_after - memory_before,
        }
    }

    /// Attach a separate load/inference split.
    pub fn with_phases(mut self, model_load_time: f64, inference_time: f64) -> Self {
        self.model_load_time = Some(model_load_time);
        self.inference_time = Some(inference_time);
        self
    }
}

/// Broad category of a failed benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    ToolMissing,
    ToolFailed,
    Timeout,
    PlatformUnsupported,
    DependencyMissing,
    PullFailed,
    /// Model absent and pulling was disabled
    ModelMissing,
    /// Anything else (I/O, serialization)
    Internal,
}

/// Optional diagnostic attached to a failure.
///
/// Declaration order is the print order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticKey {
    PlatformWarning,
    Suggestion,
    Note,
    Detail,
    Stderr,
    Stdout,
    DebugCmd,
    DebugInfo,
}

impl DiagnosticKey {
    /// Human-facing label used by the report
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKey::PlatformWarning => "⚠️  Note",
            DiagnosticKey::Suggestion => "💡 Suggestion",
            DiagnosticKey::Note => "📌 Info",
            DiagnosticKey::Detail => "🔎 Detail",
            DiagnosticKey::Stderr => "🐛 STDERR",
            DiagnosticKey::Stdout => "📋 STDOUT",
            DiagnosticKey::DebugCmd => "🔍 Failed Command",
            DiagnosticKey::DebugInfo => "🔧 Debug",
        }
    }
}

/// A benchmark that stopped before producing measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkFailure {
    pub error: String,
    #[serde(rename = "error_kind")]
    pub kind: FailureKind,
    #[serde(flatten)]
    pub details: BTreeMap<DiagnosticKey, String>,
}

impl BenchmarkFailure {
    pub fn new(kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
            details: BTreeMap::new(),
        }
    }

    /// Attach a diagnostic; blank values are dropped.
    pub fn with(mut self, key: DiagnosticKey, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.details.insert(key, trimmed.to_string());
        }
        self
    }

    /// Replace the headline message, keeping kind and diagnostics.
    pub fn with_message(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    pub fn with_opt(self, key: DiagnosticKey, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn detail(&self, key: DiagnosticKey) -> Option<&str> {
        self.details.get(&key).map(String::as_str)
    }

    /// Generic mapping from a crate error; callers usually add context on top.
    pub fn from_error(err: &Error) -> Self {
        let kind = match err {
            Error::ToolMissing { .. } => FailureKind::ToolMissing,
            Error::ToolFailed { .. } => FailureKind::ToolFailed,
            Error::Timeout { .. } => FailureKind::Timeout,
            Error::PlatformUnsupported { .. } => FailureKind::PlatformUnsupported,
            Error::DependencyMissing(_) => FailureKind::DependencyMissing,
            Error::PullFailed { .. } => FailureKind::PullFailed,
            Error::EmptyCommand | Error::IoError(_) | Error::SerializationError(_) => {
                FailureKind::Internal
            }
        };
        Self::new(kind, err.to_string())
            .with_opt(DiagnosticKey::Stderr, err.stderr())
            .with_opt(DiagnosticKey::Stdout, err.stdout())
    }
}

/// Outcome of benchmarking one backend.
///
/// Untagged on disk: successes carry `"success": true`, failures carry
/// `"error"`, and the two field sets never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BenchmarkResult {
    Success(BenchmarkSuccess),
    Failure(BenchmarkFailure),
}

impl BenchmarkResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BenchmarkResult::Success(_))
    }

    pub fn as_success(&self) -> Option<&BenchmarkSuccess> {
        match self {
            BenchmarkResult::Success(success) => Some(success),
            BenchmarkResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&BenchmarkFailure> {
        match self {
            BenchmarkResult::Success(_) => None,
            BenchmarkResult::Failure(failure) => Some(failure),
        }
    }
}

impl From<BenchmarkSuccess> for BenchmarkResult {
    fn from(success: BenchmarkSuccess) -> Self {
        BenchmarkResult::Success(success)
    }
}

impl From<BenchmarkFailure> for BenchmarkResult {
    fn from(failure: BenchmarkFailure) -> Self {
        BenchmarkResult::Failure(failure)
    }
}

/// Everything produced by one invocation of the benchmark workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seconds since the Unix epoch
    pub benchmark_time: f64,
    pub prompt: String,
    pub ollama_model: String,
    pub mlx_model: String,
    pub ollama_result: BenchmarkResult,
    pub mlx_result: BenchmarkResult,
}

impl RunRecord {
    /// Stamp a record with the current time.
    pub fn new(
        prompt: impl Into<String>,
        ollama_model: impl Into<String>,
        mlx_model: impl Into<String>,
        ollama_result: BenchmarkResult,
        mlx_result: BenchmarkResult,
    ) -> Self {
        let benchmark_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            benchmark_time,
            prompt: prompt.into(),
            ollama_model: ollama_model.into(),
            mlx_model: mlx_model.into(),
            ollama_result,
            mlx_result,
        }
    }
}
