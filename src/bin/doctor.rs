//! llm-bench-doctor: diagnose MLX-Knife installation problems
//!
//! Always runs the full checklist and exits 0.

use llm_bench::probe::{render_diagnostics, run_diagnostics, ProbePlan};
use llm_bench::{BenchConfig, SystemRunner};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = BenchConfig::from_env();
    let plan = ProbePlan::standard(&config.python, &config.mlxk_bin);
    let work_dir = std::env::current_dir().unwrap_or_else(|_| ".".into());

    let report = run_diagnostics(
        &SystemRunner,
        &plan,
        std::env::consts::ARCH,
        &work_dir,
        |key| std::env::var(key).ok(),
    );
    print!("{}", render_diagnostics(&report));
}
