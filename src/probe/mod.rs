// Availability prober
//
// Environment inspection and import/command probes behind the doctor binary.
// Nothing here raises: every failure ends up annotated in the report.

mod environment;
mod prober;
mod summary;

use std::path::Path;

pub use environment::{inspect_environment, EnvironmentStatus, PythonInfo};
pub use prober::{
    AvailabilityProber, CommandProbe, ImportProbe, ProbeCategory, ProbeOutcome, ProbePlan,
};
pub use summary::render_diagnostics;

use crate::process::CommandRunner;

/// Full output of one diagnostic run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub environment: EnvironmentStatus,
    pub imports: Vec<ProbeOutcome>,
    pub commands: Vec<ProbeOutcome>,
}

/// Inspect the environment, then run every probe in `plan`.
pub fn run_diagnostics<F>(
    runner: &dyn CommandRunner,
    plan: &ProbePlan,
    arch: &str,
    work_dir: &Path,
    env_lookup: F,
) -> DiagnosticReport
where
    F: Fn(&str) -> Option<String>,
{
    let environment = inspect_environment(runner, &plan.python, arch, work_dir, env_lookup, plan.timeout);
    let prober = AvailabilityProber::new(runner, plan, work_dir);
    DiagnosticReport {
        environment,
        imports: prober.probe_imports(),
        commands: prober.probe_commands(),
    }
}
