// Export module for run records
// Writes the run record as pretty-printed JSON, replacing any previous file

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use super::types::RunRecord;

/// File name used when no output path is configured
pub const DEFAULT_OUTPUT_FILE: &str = "benchmark_results.json";

/// Serialize `record` to `path`, overwriting whatever is there.
pub fn save_run_record(record: &RunRecord, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Wrote run record to {}", path.display());
    Ok(())
}

/// Parse a previously saved run record.
pub fn load_run_record(path: &Path) -> Result<RunRecord> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::result::types::{
        BenchmarkFailure, BenchmarkSuccess, DiagnosticKey, FailureKind,
    };
    use tempfile::TempDir;

    fn sample_record() -> RunRecord {
        let ollama = BenchmarkSuccess::from_measurement(
            "def fib(n):\n    return n if n < 2 else fib(n - 1) + fib(n - 2)",
            3.217_845_1,
            41.25,
            43.062_5,
        );
        let mlx = BenchmarkFailure::new(
            FailureKind::PlatformUnsupported,
            "MLX-Knife requires Apple Silicon (ARM64). Current platform: x86_64",
        )
        .with(DiagnosticKey::PlatformWarning, "MLX is designed specifically for Apple Silicon Macs");
        RunRecord::new("Write fib", "qwen2.5-coder:1.5b", "mlx-community/Qwen", ollama.into(), mlx.into())
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_FILE);
        let record = sample_record();

        save_run_record(&record, &path).unwrap();
        let loaded = load_run_record(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_field_names_are_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        save_run_record(&sample_record(), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for key in ["benchmark_time", "prompt", "ollama_model", "mlx_model", "ollama_result", "mlx_result"] {
            assert!(raw.get(key).is_some(), "missing {key}");
        }
        assert_eq!(raw["ollama_result"]["success"], serde_json::Value::Bool(true));
        assert!(raw["mlx_result"]["platform_warning"].is_string());
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "x".repeat(100_000)).unwrap();

        save_run_record(&sample_record(), &path).unwrap();
        assert!(load_run_record(&path).is_ok());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(save_run_record(&sample_record(), &path), Err(Error::IoError(_))));
    }
}
