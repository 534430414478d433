use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::result::DEFAULT_OUTPUT_FILE;

/// Default model for the generic runner
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:1.5b";
/// Default model for the Apple-Silicon runner (MLX naming differs from Ollama's)
pub const DEFAULT_MLX_MODEL: &str = "mlx-community/Qwen2.5-Coder-1.5B-Instruct-4bit";
/// Default benchmark prompt
pub const DEFAULT_PROMPT: &str = "Write a Python function to calculate the fibonacci sequence.";

/// Environment variable overriding the `ollama` executable
pub const OLLAMA_BIN_ENV: &str = "OLLAMA_BIN";
/// Environment variable overriding the `mlxk` executable
pub const MLXK_BIN_ENV: &str = "MLXK_BIN";
/// Environment variable overriding the Python interpreter
pub const PYTHON_ENV: &str = "LLM_BENCH_PYTHON";

/// Settings shared by both benchmark runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Bound for `list`, `--help` and dependency probes, in seconds
    pub tool_check_timeout_secs: u64,
    /// Bound for model downloads, in seconds
    pub pull_timeout_secs: u64,
    /// Bound for the timed inference call, in seconds
    pub inference_timeout_secs: u64,
    /// Fail instead of downloading a model that is not installed
    pub skip_pull: bool,
    /// Where the run record is written
    pub output_path: PathBuf,
    /// Exit non-zero when either backend fails
    pub strict: bool,
    /// Executable for the generic runner
    pub ollama_bin: String,
    /// Executable for the Apple-Silicon runner
    pub mlxk_bin: String,
    /// Interpreter used for library import checks
    pub python: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            tool_check_timeout_secs: 30,
            pull_timeout_secs: 20 * 60,
            inference_timeout_secs: 5 * 60,
            skip_pull: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            strict: false,
            ollama_bin: "ollama".to_string(),
            mlxk_bin: "mlxk".to_string(),
            python: "python3".to_string(),
        }
    }
}

impl BenchConfig {
    /// Defaults with executable overrides taken from the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply executable overrides from `lookup`; empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(bin) = non_empty(OLLAMA_BIN_ENV) {
            self.ollama_bin = bin;
        }
        if let Some(bin) = non_empty(MLXK_BIN_ENV) {
            self.mlxk_bin = bin;
        }
        if let Some(python) = non_empty(PYTHON_ENV) {
            self.python = python;
        }
        self
    }

    pub fn tool_check_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_check_timeout_secs)
    }

    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.pull_timeout_secs)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }
}

/// "5 minutes", "90 seconds"
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_timeouts() {
        let config = BenchConfig::default();
        assert_eq!(config.tool_check_timeout(), Duration::from_secs(30));
        assert_eq!(config.pull_timeout(), Duration::from_secs(1200));
        assert_eq!(config.inference_timeout(), Duration::from_secs(300));
        assert_eq!(config.output_path, PathBuf::from("benchmark_results.json"));
        assert!(!config.skip_pull);
        assert!(!config.strict);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (OLLAMA_BIN_ENV, "/opt/ollama/bin/ollama"),
            (MLXK_BIN_ENV, "  "),
            (PYTHON_ENV, "/usr/bin/python3.11"),
        ]
        .into_iter()
        .collect();
        let config = BenchConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.ollama_bin, "/opt/ollama/bin/ollama");
        assert_eq!(config.mlxk_bin, "mlxk");
        assert_eq!(config.python, "/usr/bin/python3.11");
    }

    #[test]
    fn test_describe_duration() {
        assert_eq!(describe_duration(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_duration(Duration::from_secs(90)), "90 seconds");
        assert_eq!(describe_duration(Duration::from_secs(1)), "1 second");
    }
}
