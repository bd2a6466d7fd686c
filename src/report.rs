//! Summary table, JSON reports and process exit codes.

use crate::fixture::RunReport;
use launchbench_common::{BenchError, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Exit codes for CI triage
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_GENERIC_FAIL: i32 = 1;
pub const EXIT_VALIDATION_FAIL: i32 = 2;

/// Exit code for a run that failed with `err`.
pub fn exit_code(err: &BenchError) -> i32 {
    if err.is_validation() { EXIT_VALIDATION_FAIL } else { EXIT_GENERIC_FAIL }
}

/// Variant every speedup is measured against.
pub const BASELINE: &str = "Basic";

/// Comparison table of completed runs.
pub fn format_summary(reports: &[RunReport]) -> String {
    let baseline =
        reports.iter().find(|r| r.name == BASELINE).and_then(RunReport::mean_iteration_ms);

    let mut out = String::new();
    let _ = writeln!(out, "\n=== Launch Strategy Comparison ===");
    let _ = writeln!(
        out,
        "{:<20} {:>12} {:>12} {:>10} {:>10} {:>9}",
        "Variant", "Iterations", "ms/iter", "GiB/s", "Speedup", "Verified"
    );
    let _ = writeln!(out, "{:-<78}", "");
    for report in reports {
        let mean = report.mean_iteration_ms();
        let speedup = match (baseline, mean) {
            (Some(base), Some(m)) if m > 0.0 => format!("{:.2}x", base / m),
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<20} {:>12} {:>12} {:>10} {:>10} {:>9}",
            report.name,
            report.iterations,
            mean.map_or_else(|| "-".to_string(), |m| format!("{m:.3}")),
            report.throughput_gib_s().map_or_else(|| "-".to_string(), |t| format!("{t:.2}")),
            speedup,
            if report.verified { "yes" } else { "no" },
        );
    }
    out
}

pub fn print_summary(reports: &[RunReport]) {
    if reports.is_empty() {
        return;
    }
    print!("{}", format_summary(reports));
}

/// Write each report to `<dir>/<name>.json`, creating `dir` if needed.
pub fn write_reports(dir: &Path, reports: &[RunReport]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        let path = dir.join(format!("{}.json", report.name));
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        info!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}
