use llm_bench::{
    error::{Error, Result},
    probe::{
        render_diagnostics, run_diagnostics, AvailabilityProber, ProbeCategory, ProbePlan,
    },
    process::{CommandOutput, CommandRunner, CommandSpec},
};
use std::cell::RefCell;
use std::path::Path;
use tempfile::TempDir;

// Fake host: `python3` imports only psutil, `pip` works, `mlxk` is not on PATH.
#[derive(Default)]
struct FakeHost {
    calls: RefCell<Vec<String>>,
}

impl CommandRunner for FakeHost {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.to_string());
        let output = |stdout: &str, stderr: &str, exit_code: i32| CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        };
        match spec.program.as_str() {
            "python3" => {
                let arg = spec.args.last().cloned().unwrap_or_default();
                if spec.args[0] == "--version" {
                    Ok(output("Python 3.11.6", "", 0))
                } else if arg.starts_with("import sys") {
                    Ok(output("3.11.6\nFalse\n/usr/bin/python3\n", "", 0))
                } else if arg == "import psutil" {
                    Ok(output("", "", 0))
                } else {
                    let module = arg.trim_start_matches("import ");
                    Ok(output(
                        "",
                        &format!("Traceback (most recent call last):\nModuleNotFoundError: No module named '{}'\n", module),
                        1,
                    ))
                }
            }
            "pip" => Ok(output("pip 23.2 from /usr/lib/python3", "", 0)),
            program if program.ends_with(".venv/bin/mlxk") => Ok(output("mlx-knife 1.1.0", "", 0)),
            _ => Err(Error::ToolMissing {
                tool: spec.program.clone(),
            }),
        }
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

fn install_venv_mlxk(dir: &Path) {
    let bin = dir.join(".venv").join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("mlxk"), "#!/bin/sh\n").unwrap();
}

#[test]
fn test_import_probes_report_load_errors() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::default();
    let plan = ProbePlan::standard("python3", "mlxk");
    let prober = AvailabilityProber::new(&host, &plan, dir.path());

    let outcomes = prober.probe_imports();

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.category == ProbeCategory::Import));
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].name, "psutil");
    assert!(!outcomes[1].success);
    assert_eq!(outcomes[1].detail, "ModuleNotFoundError: No module named 'mlx'");
}

#[test]
fn test_critical_tool_without_alternate_is_tried_once() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::default();
    let plan = ProbePlan::standard("python3", "mlxk");
    let prober = AvailabilityProber::new(&host, &plan, dir.path());

    let outcomes = prober.probe_commands();

    assert_eq!(outcomes.len(), 5);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].output.as_ref().unwrap().stdout, "Python 3.11.6");
    assert!(outcomes[1].success);
    for outcome in &outcomes[2..] {
        assert!(!outcome.success);
        assert_eq!(outcome.detail, "Command not found");
        assert!(outcome.output.is_none());
    }
}

#[test]
fn test_critical_tool_retried_from_alternate_location() {
    let dir = TempDir::new().unwrap();
    install_venv_mlxk(dir.path());
    let host = FakeHost::default();
    let plan = ProbePlan::standard("python3", "mlxk");
    let prober = AvailabilityProber::new(&host, &plan, dir.path());

    let outcomes = prober.probe_commands();

    // Three mlxk probes, each followed by its .venv retry.
    assert_eq!(outcomes.len(), 8);
    let retries: Vec<_> = outcomes
        .iter()
        .filter(|o| o.description.ends_with("(via .venv)"))
        .collect();
    assert_eq!(retries.len(), 3);
    assert!(retries.iter().all(|o| o.success));
    assert!(retries[0].name.contains(".venv/bin/mlxk --version"));

    let calls = host.calls.borrow();
    let primary = calls.iter().position(|c| c == "mlxk --version").unwrap();
    assert!(calls[primary + 1].ends_with(".venv/bin/mlxk --version"));
}

#[test]
fn test_non_critical_tool_is_not_retried() {
    let dir = TempDir::new().unwrap();
    install_venv_mlxk(dir.path());
    let host = FakeHost::default();
    let mut plan = ProbePlan::standard("python3", "mlxk");
    plan.critical_tools.clear();
    let prober = AvailabilityProber::new(&host, &plan, dir.path());

    let outcomes = prober.probe_commands();

    assert_eq!(outcomes.len(), 5);
    assert!(host.calls.borrow().iter().all(|c| !c.contains(".venv")));
}

#[test]
fn test_full_diagnostic_report() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".venv")).unwrap();
    let host = FakeHost::default();
    let plan = ProbePlan::standard("python3", "mlxk");

    let report = run_diagnostics(&host, &plan, "x86_64", dir.path(), no_env);

    assert!(!report.environment.mlx_compatible);
    assert_eq!(report.environment.python.as_ref().unwrap().version, "3.11.6");
    assert!(!report.environment.venv_active());
    assert!(report.environment.local_venv_exists);

    let text = render_diagnostics(&report);
    assert!(text.contains("🖥️  Platform: x86_64"));
    assert!(text.contains("WARNING: MLX-Knife requires Apple Silicon"));
    assert!(text.contains("🐍 Python: 3.11.6"));
    assert!(text.contains("Virtual Environment Active: false"));
    assert!(text.contains(".venv directory exists: true"));
    assert!(text.contains("✅ psutil: OK (Process monitoring library)"));
    assert!(text.contains("❌ mlx_knife: FAILED - ModuleNotFoundError: No module named 'mlx_knife'"));
    assert!(text.contains("❌ Command not found"));
    assert!(text.contains("📋 SUMMARY:"));
}

#[test]
fn test_virtual_env_variable_marks_venv_active() {
    let dir = TempDir::new().unwrap();
    let host = FakeHost::default();
    let plan = ProbePlan::standard("python3", "mlxk");

    let report = run_diagnostics(&host, &plan, "arm64", dir.path(), |key| {
        (key == "VIRTUAL_ENV").then(|| "/work/.venv".to_string())
    });

    assert!(report.environment.mlx_compatible);
    assert!(report.environment.venv_active());
    let text = render_diagnostics(&report);
    assert!(text.contains("Platform is compatible with MLX"));
    assert!(text.contains("Python Executable: /usr/bin/python3"));
}
