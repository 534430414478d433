use std::fmt;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::config::BenchConfig;
use crate::error::Error;
use crate::process::CommandSpec;
use crate::result::{BenchmarkFailure, DiagnosticKey, FailureKind};

/// Architectures MLX can run on, as reported by Rust (`aarch64`) or Python (`arm64`)
pub const APPLE_SILICON_ARCHES: &[&str] = &["arm64", "aarch64"];

/// Which model runner a descriptor drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Generic runner (https://ollama.com)
    Ollama,
    /// Apple-Silicon runner on top of MLX (https://github.com/mzau/mlx-knife)
    MlxKnife,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Ollama => write!(f, "Ollama"),
            BackendKind::MlxKnife => write!(f, "MLX-Knife"),
        }
    }
}

/// Library probe run before inference; success requires `marker` on stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCheck {
    pub argv: Vec<String>,
    pub marker: String,
    pub suggestion: String,
}

/// Everything that differs between the two runners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub kind: BackendKind,
    /// Executable name or path
    pub binary: String,
    /// Architectures the backend runs on (None = any)
    pub allowed_arches: Option<Vec<String>>,
    /// Runtime library check (None = CLI only)
    pub dependency: Option<DependencyCheck>,
    /// Appended to every `run` invocation
    pub run_flags: Vec<String>,
    /// Parse `load duration:` from the run's stderr
    pub reports_load_time: bool,
}

impl BackendDescriptor {
    pub fn ollama(config: &BenchConfig) -> Self {
        Self {
            kind: BackendKind::Ollama,
            binary: config.ollama_bin.clone(),
            allowed_arches: None,
            dependency: None,
            run_flags: vec!["--verbose".to_string()],
            reports_load_time: true,
        }
    }

    pub fn mlx_knife(config: &BenchConfig) -> Self {
        Self {
            kind: BackendKind::MlxKnife,
            binary: config.mlxk_bin.clone(),
            allowed_arches: Some(APPLE_SILICON_ARCHES.iter().map(|a| a.to_string()).collect()),
            dependency: Some(DependencyCheck {
                argv: vec![
                    config.python.clone(),
                    "-c".to_string(),
                    "import mlx; import mlx_lm; print(\"MLX OK\")".to_string(),
                ],
                marker: "MLX OK".to_string(),
                suggestion: "Install MLX framework first: pip install mlx mlx-lm".to_string(),
            }),
            run_flags: vec!["--no-stream".to_string()],
            reports_load_time: false,
        }
    }

    pub fn label(&self) -> String {
        self.kind.to_string()
    }

    pub fn platform_supported(&self, arch: &str) -> bool {
        match &self.allowed_arches {
            Some(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(arch)),
            None => true,
        }
    }

    pub fn list_command(&self) -> CommandSpec {
        CommandSpec::new(self.binary.clone(), ["list"])
    }

    pub fn pull_command(&self, model: &str) -> CommandSpec {
        CommandSpec::new(self.binary.clone(), ["pull", model]).streaming()
    }

    pub fn run_command(&self, model: &str, prompt: &str) -> CommandSpec {
        let mut args = vec!["run".to_string(), model.to_string(), prompt.to_string()];
        args.extend(self.run_flags.iter().cloned());
        CommandSpec::new(self.binary.clone(), args)
    }

    /// Failure for an architecture outside `allowed_arches`
    pub fn platform_failure(&self, arch: &str) -> BenchmarkFailure {
        let err = Error::PlatformUnsupported { arch: arch.to_string() };
        BenchmarkFailure::from_error(&err)
            .with_message(format!(
                "{} requires Apple Silicon (ARM64). Current platform: {}",
                self.label(),
                arch
            ))
            .with(
                DiagnosticKey::PlatformWarning,
                "MLX is designed specifically for Apple Silicon Macs",
            )
    }

    /// Failure for an executable that could not be spawned.
    ///
    /// For MLX-Knife, an unactivated `.venv` under `work_dir` is called out.
    pub fn missing_tool_failure(&self, work_dir: &Path) -> BenchmarkFailure {
        match self.kind {
            BackendKind::Ollama => BenchmarkFailure::new(
                FailureKind::ToolMissing,
                "Ollama not found. Please install Ollama first.",
            )
            .with(DiagnosticKey::Suggestion, "Install from https://ollama.com/download"),
            BackendKind::MlxKnife => {
                if work_dir.join(".venv").join("bin").join("mlxk").exists() {
                    BenchmarkFailure::new(
                        FailureKind::ToolMissing,
                        "mlx-knife not found in PATH. Virtual environment may not be activated.",
                    )
                    .with(
                        DiagnosticKey::Suggestion,
                        "Try: source .venv/bin/activate && llm-bench",
                    )
                } else {
                    BenchmarkFailure::new(
                        FailureKind::ToolMissing,
                        "mlx-knife not found. Please install with: pip install mlx-knife",
                    )
                    .with(DiagnosticKey::Note, "MLX-Knife requires Apple Silicon and MLX framework")
                }
            }
        }
    }

    /// Hint attached when `list` runs but fails
    pub fn list_failure_suggestion(&self) -> &'static str {
        match self.kind {
            BackendKind::Ollama => "Check that the Ollama server is running: ollama serve",
            BackendKind::MlxKnife => {
                "Check if mlx-knife is properly installed and MLX framework is available"
            }
        }
    }
}
