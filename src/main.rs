//! llm-bench: compare Ollama and MLX-Knife on the same prompt
//!
//! Runs one inference per backend, prints a side-by-side report and writes
//! the run record to `benchmark_results.json`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use llm_bench::config::{DEFAULT_MLX_MODEL, DEFAULT_OLLAMA_MODEL, DEFAULT_PROMPT};
use llm_bench::{
    print_report, run_comparison, save_run_record, BackendDescriptor, BenchConfig, Benchmarker,
    ComparisonPlan, ProcessMemorySampler, SystemRunner,
};

#[derive(Parser)]
#[command(name = "llm-bench")]
#[command(about = "Benchmark MLX-Knife vs Ollama performance")]
#[command(version)]
struct Cli {
    /// Ollama model name to benchmark
    #[arg(long, default_value = DEFAULT_OLLAMA_MODEL)]
    model: String,

    /// MLX-Knife model name (MLX uses its own naming)
    #[arg(long, default_value = DEFAULT_MLX_MODEL)]
    mlx_model: String,

    /// Prompt to use for benchmarking
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Skip pulling models that are not already available
    #[arg(long)]
    skip_pull: bool,

    /// Where to write the run record
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Inference timeout in seconds
    #[arg(long)]
    inference_timeout: Option<u64>,

    /// Model pull timeout in seconds
    #[arg(long)]
    pull_timeout: Option<u64>,

    /// Exit with status 1 if either backend fails
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let mut config = BenchConfig::from_env();
        config.skip_pull = self.skip_pull;
        config.strict = self.strict;
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(secs) = self.inference_timeout {
            config.inference_timeout_secs = secs;
        }
        if let Some(secs) = self.pull_timeout {
            config.pull_timeout_secs = secs;
        }
        config
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config();
    let ollama = BackendDescriptor::ollama(&config);
    let mlx = BackendDescriptor::mlx_knife(&config);

    println!("🚀 Starting benchmark comparison between {} and {}", ollama.label(), mlx.label());
    println!("📝 Prompt: {}", cli.prompt);
    println!("🦙 {} Model: {}", ollama.label(), cli.model);
    println!("🔪 {} Model: {}", mlx.label(), cli.mlx_model);
    if config.skip_pull {
        println!("⚠️  Skip pull enabled - will only use already downloaded models");
    }
    println!("{}", "-".repeat(80));

    let runner = SystemRunner;
    let sampler = ProcessMemorySampler::new();
    let benchmarker = Benchmarker::new(&runner, &sampler, &config);
    let plan = ComparisonPlan {
        prompt: cli.prompt.clone(),
        ollama_model: cli.model.clone(),
        mlx_model: cli.mlx_model.clone(),
    };

    let record = run_comparison(&benchmarker, &ollama, &mlx, &plan);
    print_report(&ollama.label(), &record.ollama_result, &mlx.label(), &record.mlx_result);

    save_run_record(&record, &config.output_path)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;
    println!("\n💾 Results saved to {}", config.output_path.display());

    if config.strict && record.any_failed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
