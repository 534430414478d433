use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::error::Error;
use crate::process::{CommandOutput, CommandRunner, CommandSpec};

/// Whether an item was probed by importing it or by running it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCategory {
    Import,
    Command,
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeCategory::Import => write!(f, "import"),
            ProbeCategory::Command => write!(f, "command"),
        }
    }
}

/// Result of probing a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Module name or full command line
    pub name: String,
    pub description: String,
    pub category: ProbeCategory,
    pub success: bool,
    /// Load error, or why the command could not be run
    pub detail: String,
    /// Captured output when the command ran to completion
    pub output: Option<CommandOutput>,
}

/// A package to try importing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProbe {
    pub module: String,
    pub description: String,
}

/// A command to try running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProbe {
    pub argv: Vec<String>,
    pub description: String,
}

/// Everything the doctor checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    /// Interpreter used for import probes
    pub python: String,
    pub imports: Vec<ImportProbe>,
    pub commands: Vec<CommandProbe>,
    /// Programs retried from `alternate_dir` when not found on PATH
    pub critical_tools: Vec<String>,
    /// Relative to the working directory
    pub alternate_dir: PathBuf,
    pub timeout: Duration,
}

impl ProbePlan {
    /// The MLX-Knife checklist.
    pub fn standard(python: &str, mlxk: &str) -> Self {
        let import = |module: &str, description: &str| ImportProbe {
            module: module.to_string(),
            description: description.to_string(),
        };
        let command = |argv: &[&str], description: &str| CommandProbe {
            argv: argv.iter().map(|a| a.to_string()).collect(),
            description: description.to_string(),
        };
        Self {
            python: python.to_string(),
            imports: vec![
                import("psutil", "Process monitoring library"),
                import("mlx", "Apple MLX framework"),
                import("mlx_lm", "MLX language models"),
                import("mlx_knife", "MLX-Knife package"),
            ],
            commands: vec![
                command(&[python, "--version"], "Python 3 version"),
                command(&["pip", "--version"], "pip package manager"),
                command(&[mlxk, "--version"], "MLX-Knife version"),
                command(&[mlxk, "--help"], "MLX-Knife help"),
                command(&[mlxk, "list"], "MLX-Knife model list"),
            ],
            critical_tools: vec![mlxk.to_string()],
            alternate_dir: Path::new(".venv").join("bin"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Runs a [`ProbePlan`]; failures are recorded, never raised
pub struct AvailabilityProber<'a> {
    runner: &'a dyn CommandRunner,
    plan: &'a ProbePlan,
    work_dir: PathBuf,
}

impl<'a> AvailabilityProber<'a> {
    pub fn new(runner: &'a dyn CommandRunner, plan: &'a ProbePlan, work_dir: impl AsRef<Path>) -> Self {
        Self {
            runner,
            plan,
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    pub fn probe_imports(&self) -> Vec<ProbeOutcome> {
        self.plan.imports.iter().map(|probe| self.probe_import(probe)).collect()
    }

    fn probe_import(&self, probe: &ImportProbe) -> ProbeOutcome {
        let spec = CommandSpec::new(self.plan.python.clone(), ["-c".to_string(), format!("import {}", probe.module)])
            .with_timeout(self.plan.timeout);
        debug!("Probing import {}", probe.module);

        let (success, detail) = match self.runner.run(&spec) {
            Ok(output) if output.success() => (true, "OK".to_string()),
            Ok(output) => (false, last_line(&output.stderr).unwrap_or("import failed").to_string()),
            Err(Error::ToolMissing { tool }) => (false, format!("{} not found", tool)),
            Err(err) => (false, err.to_string()),
        };

        ProbeOutcome {
            name: probe.module.clone(),
            description: probe.description.clone(),
            category: ProbeCategory::Import,
            success,
            detail,
            output: None,
        }
    }

    /// Run each command; critical tools missing from PATH get one more try
    /// from the alternate directory, recorded as its own outcome.
    pub fn probe_commands(&self) -> Vec<ProbeOutcome> {
        let mut outcomes = Vec::new();
        for probe in &self.plan.commands {
            let spec = match CommandSpec::from_argv(&probe.argv) {
                Ok(spec) => spec.with_timeout(self.plan.timeout),
                Err(err) => {
                    outcomes.push(ProbeOutcome {
                        name: String::new(),
                        description: probe.description.clone(),
                        category: ProbeCategory::Command,
                        success: false,
                        detail: err.to_string(),
                        output: None,
                    });
                    continue;
                }
            };

            let (outcome, not_found) = self.probe_command(&spec, &probe.description);
            outcomes.push(outcome);

            if not_found && self.plan.critical_tools.contains(&spec.program) {
                if let Some(alternate) = self.alternate_path(&spec.program) {
                    info!("Retrying {} from {}", spec.program, alternate.display());
                    let retry = spec.with_program(alternate.to_string_lossy());
                    let (outcome, _) = self.probe_command(&retry, &format!("{} (via .venv)", probe.description));
                    outcomes.push(outcome);
                }
            }
        }
        outcomes
    }

    fn probe_command(&self, spec: &CommandSpec, description: &str) -> (ProbeOutcome, bool) {
        let mut outcome = ProbeOutcome {
            name: spec.to_string(),
            description: description.to_string(),
            category: ProbeCategory::Command,
            success: false,
            detail: String::new(),
            output: None,
        };
        let mut not_found = false;

        match self.runner.run(spec) {
            Ok(output) => {
                outcome.success = output.success();
                outcome.detail = format!("Exit Code: {}", output.exit_code);
                outcome.output = Some(output);
            }
            Err(Error::ToolMissing { .. }) => {
                not_found = true;
                outcome.detail = "Command not found".to_string();
            }
            Err(Error::Timeout { .. }) => outcome.detail = "Command timed out".to_string(),
            Err(err) => outcome.detail = format!("Error: {}", err),
        }
        (outcome, not_found)
    }

    fn alternate_path(&self, program: &str) -> Option<PathBuf> {
        let name = Path::new(program).file_name()?;
        let candidate = self.work_dir.join(&self.plan.alternate_dir).join(name);
        candidate.is_file().then_some(candidate)
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}
