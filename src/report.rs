// Report printer
//
// Side-by-side rendering of two benchmark results plus relative metrics
// when both runs succeeded.

use std::fmt::Write;

use strum::IntoEnumIterator;

use crate::result::{BenchmarkResult, BenchmarkSuccess, DiagnosticKey};

const RULE_WIDTH: usize = 80;

/// Which side came out ahead, and on what grounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// Specialized backend produced more tokens per second
    SpecializedSpeed,
    /// Specialized backend finished sooner overall
    SpecializedTotalTime,
    /// Neither of the above
    Generic,
}

/// Relative metrics, specialized vs generic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// specialized tok/s ÷ generic tok/s (0 when generic tok/s ≤ 0)
    pub speed_ratio: f64,
    /// generic total time ÷ specialized total time (0 when specialized time ≤ 0)
    pub time_ratio: f64,
    /// specialized memory delta − generic memory delta, in MB
    pub memory_diff: f64,
    pub winner: Winner,
}

/// Compute ratios and pick a winner.
///
/// Speed is checked first, then total time; memory never decides.
pub fn compare(generic: &BenchmarkSuccess, specialized: &BenchmarkSuccess) -> Comparison {
    let speed_ratio = if generic.tokens_per_second > 0.0 {
        specialized.tokens_per_second / generic.tokens_per_second
    } else {
        0.0
    };
    let time_ratio = if specialized.total_time > 0.0 {
        generic.total_time / specialized.total_time
    } else {
        0.0
    };
    let memory_diff = specialized.memory_delta - generic.memory_delta;

    let winner = if speed_ratio > 1.0 {
        Winner::SpecializedSpeed
    } else if time_ratio > 1.0 {
        Winner::SpecializedTotalTime
    } else {
        Winner::Generic
    };

    Comparison {
        speed_ratio,
        time_ratio,
        memory_diff,
        winner,
    }
}

/// Render the full report as text.
pub fn render_report(
    generic_label: &str,
    generic: &BenchmarkResult,
    specialized_label: &str,
    specialized: &BenchmarkResult,
) -> String {
    let mut report = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(report, "\n{}", rule);
    let _ = writeln!(report, "🏆 BENCHMARK RESULTS");
    let _ = writeln!(report, "{}", rule);

    render_section(&mut report, "📊", generic_label, generic);
    render_section(&mut report, "🔪", specialized_label, specialized);

    if let (Some(g), Some(s)) = (generic.as_success(), specialized.as_success()) {
        let comparison = compare(g, s);
        let _ = writeln!(report, "\n🆚 COMPARISON:");
        let _ = writeln!(
            report,
            "  🏃 Speed: {} is {:.2}x {} than {}",
            specialized_label,
            comparison.speed_ratio,
            if comparison.speed_ratio > 1.0 { "faster" } else { "slower" },
            generic_label
        );
        let _ = writeln!(
            report,
            "  ⏰ Time: {} is {:.2}x {} than {}",
            specialized_label,
            comparison.time_ratio,
            if comparison.time_ratio > 1.0 { "faster" } else { "slower" },
            generic_label
        );
        let _ = writeln!(
            report,
            "  💾 Memory: {} uses {:+.2} MB {} than {}",
            specialized_label,
            comparison.memory_diff,
            if comparison.memory_diff > 0.0 { "more" } else { "less" },
            generic_label
        );
        let winner = match comparison.winner {
            Winner::SpecializedSpeed => format!("{} (speed)", specialized_label),
            Winner::SpecializedTotalTime => format!("{} (total time)", specialized_label),
            Winner::Generic => generic_label.to_string(),
        };
        let _ = writeln!(report, "  🏆 Winner: {}", winner);
    }

    report
}

/// Render and print to stdout.
pub fn print_report(
    generic_label: &str,
    generic: &BenchmarkResult,
    specialized_label: &str,
    specialized: &BenchmarkResult,
) {
    print!("{}", render_report(generic_label, generic, specialized_label, specialized));
}

fn render_section(report: &mut String, icon: &str, label: &str, result: &BenchmarkResult) {
    let _ = writeln!(report, "\n{} {} RESULTS:", icon, label.to_uppercase());
    match result {
        BenchmarkResult::Success(success) => {
            let _ = writeln!(report, "  ✅ Success: true");
            if let (Some(load), Some(inference)) = (success.model_load_time, success.inference_time) {
                let _ = writeln!(report, "  📥 Model Load Time: {:.2}s", load);
                let _ = writeln!(report, "  ⚡ Inference Time: {:.2}s", inference);
            }
            let _ = writeln!(report, "  ⏱️  Total Time: {:.2}s", success.total_time);
            let _ = writeln!(report, "  🚀 Tokens/sec: {:.2}", success.tokens_per_second);
            let _ = writeln!(report, "  💾 Memory Delta: {:.2} MB", success.memory_delta);
            let _ = writeln!(report, "  📝 Response Length: {} tokens", success.estimated_tokens);
        }
        BenchmarkResult::Failure(failure) => {
            let _ = writeln!(report, "  ❌ Error: {}", failure.error);
            for key in DiagnosticKey::iter() {
                if let Some(value) = failure.detail(key) {
                    let _ = writeln!(report, "  {}: {}", key.label(), value);
                }
            }
        }
    }
}
