use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use crate::backend::APPLE_SILICON_ARCHES;
use crate::process::{CommandRunner, CommandSpec};

/// Prints version, whether a virtualenv is active, and the interpreter path
const PYTHON_INFO_SCRIPT: &str = "import sys; print(sys.version.split()[0]); \
print(sys.prefix != getattr(sys, 'base_prefix', sys.prefix)); print(sys.executable)";

/// What the interpreter reports about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonInfo {
    pub version: String,
    pub in_virtualenv: bool,
    pub executable: String,
}

/// Snapshot of the host as seen by the doctor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentStatus {
    pub arch: String,
    pub mlx_compatible: bool,
    /// None when the interpreter could not be run
    pub python: Option<PythonInfo>,
    /// Value of `VIRTUAL_ENV`, if set
    pub virtual_env: Option<String>,
    /// `.venv` directory under the working directory
    pub local_venv_dir: PathBuf,
    pub local_venv_exists: bool,
}

impl EnvironmentStatus {
    pub fn venv_active(&self) -> bool {
        self.virtual_env.is_some() || self.python.as_ref().map_or(false, |p| p.in_virtualenv)
    }
}

/// Inspect architecture, interpreter and virtualenv state.
///
/// Only reads: runs the interpreter once and checks the filesystem.
pub fn inspect_environment<F>(
    runner: &dyn CommandRunner,
    python: &str,
    arch: &str,
    work_dir: &Path,
    env_lookup: F,
    timeout: Duration,
) -> EnvironmentStatus
where
    F: Fn(&str) -> Option<String>,
{
    let spec = CommandSpec::new(python, ["-c", PYTHON_INFO_SCRIPT])
        .with_timeout(timeout)
        .checked();
    let python = match runner.run(&spec) {
        Ok(output) => parse_python_info(&output.stdout),
        Err(err) => {
            debug!("Python inspection failed: {}", err);
            None
        }
    };

    let local_venv_dir = work_dir.join(".venv");
    EnvironmentStatus {
        arch: arch.to_string(),
        mlx_compatible: APPLE_SILICON_ARCHES.iter().any(|a| a.eq_ignore_ascii_case(arch)),
        python,
        virtual_env: env_lookup("VIRTUAL_ENV").filter(|v| !v.trim().is_empty()),
        local_venv_exists: local_venv_dir.is_dir(),
        local_venv_dir,
    }
}

fn parse_python_info(stdout: &str) -> Option<PythonInfo> {
    let mut lines = stdout.lines().map(str::trim);
    let version = lines.next().filter(|v| !v.is_empty())?.to_string();
    let in_virtualenv = lines.next()? == "True";
    let executable = lines.next().unwrap_or_default().to_string();
    Some(PythonInfo {
        version,
        in_virtualenv,
        executable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_python_info() {
        let info = parse_python_info("3.11.6\nTrue\n/work/.venv/bin/python3\n").unwrap();
        assert_eq!(info.version, "3.11.6");
        assert!(info.in_virtualenv);
        assert_eq!(info.executable, "/work/.venv/bin/python3");

        let info = parse_python_info("3.9.1\nFalse\n").unwrap();
        assert!(!info.in_virtualenv);
        assert_eq!(info.executable, "");

        assert!(parse_python_info("").is_none());
    }
}
