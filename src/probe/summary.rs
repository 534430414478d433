// Human-readable rendering of a diagnostic run

use std::fmt::Write;

use super::environment::EnvironmentStatus;
use super::prober::ProbeOutcome;
use super::DiagnosticReport;

const REMEDIATION: &[&str] = &[
    "1. Make sure you're on Apple Silicon (ARM64)",
    "2. Activate the virtual environment: source .venv/bin/activate",
    "3. Install missing packages: pip install mlx mlx-lm mlx-knife",
    "4. Verify with: mlxk --help",
];

pub fn render_diagnostics(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🔍 MLX-Knife Diagnostic Tool");
    let _ = writeln!(out, "{}", "=".repeat(50));

    render_environment(&mut out, &report.environment);

    let _ = writeln!(out, "\n🧪 Testing Python Imports:");
    for outcome in &report.imports {
        if outcome.success {
            let _ = writeln!(out, "   ✅ {}: OK ({})", outcome.name, outcome.description);
        } else {
            let _ = writeln!(out, "   ❌ {}: FAILED - {}", outcome.name, outcome.detail);
        }
    }

    let _ = writeln!(out, "\n🧪 Testing Command Line Tools:");
    for outcome in &report.commands {
        render_command(&mut out, outcome);
    }

    let _ = writeln!(out, "\n📋 SUMMARY:");
    let _ = writeln!(out, "If you see errors above:");
    for line in REMEDIATION {
        let _ = writeln!(out, "{}", line);
    }
    out
}

fn render_environment(out: &mut String, env: &EnvironmentStatus) {
    let _ = writeln!(out, "\n🖥️  Platform: {}", env.arch);
    if env.mlx_compatible {
        let _ = writeln!(out, "✅ Platform is compatible with MLX");
    } else {
        let _ = writeln!(out, "⚠️  WARNING: MLX-Knife requires Apple Silicon (ARM64)");
        let _ = writeln!(out, "   Current platform is not supported by MLX framework");
    }

    match &env.python {
        Some(python) => {
            let _ = writeln!(out, "\n🐍 Python: {}", python.version);
        }
        None => {
            let _ = writeln!(out, "\n🐍 Python: not available");
        }
    }

    let _ = writeln!(out, "🌐 Virtual Environment Active: {}", env.venv_active());
    if env.venv_active() {
        if let Some(python) = &env.python {
            let _ = writeln!(out, "   Python Executable: {}", python.executable);
        }
    }
    let _ = writeln!(out, "📁 .venv directory exists: {}", env.local_venv_exists);
}

fn render_command(out: &mut String, outcome: &ProbeOutcome) {
    let _ = writeln!(out, "\n🧪 Testing: {}", outcome.description);
    let _ = writeln!(out, "   Command: {}", outcome.name);
    match &outcome.output {
        Some(output) => {
            let _ = writeln!(out, "   Exit Code: {}", output.exit_code);
            if !output.stdout.trim().is_empty() {
                let _ = writeln!(out, "   STDOUT: {}", output.stdout.trim());
            }
            if !output.stderr.trim().is_empty() {
                let _ = writeln!(out, "   STDERR: {}", output.stderr.trim());
            }
        }
        None => {
            let _ = writeln!(out, "   ❌ {}", outcome.detail);
        }
    }
}
