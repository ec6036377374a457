use std::path::{Path, PathBuf};

use clap::Parser;

use crate::plot::PLOT_FILE_NAME;

/// Name of the results file written by the benchmark harness.
pub const SUMMARY_FILE_NAME: &str = "summary.csv";
/// Name of the aggregated results file.
pub const AGGREGATE_FILE_NAME: &str = "aggregate_summary.csv";

/// Summarise actor benchmark results by `(actors, messages)` configuration.
///
/// With no arguments, everything is read from and written to the `perf_results` directory at
/// the root of this repository.
#[derive(Debug, Default, Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the benchmark results.
    #[arg(long, env = "PERF_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Path to the results file [default: <results-dir>/summary.csv].
    #[arg(long, env = "PERF_SUMMARY_PATH")]
    pub summary: Option<PathBuf>,

    /// Path to write the aggregates to [default: <results-dir>/aggregate_summary.csv].
    #[arg(long, env = "PERF_AGGREGATE_PATH")]
    pub output: Option<PathBuf>,

    /// Path to save the chart to [default: <results-dir>/elapsed_vs_actors.png].
    #[arg(long, env = "PERF_PLOT_PATH")]
    pub plot_path: Option<PathBuf>,

    /// Do not attempt to render the chart.
    #[arg(long)]
    pub skip_plot: bool,
}

impl CliArgs {
    /// The directory the default paths are resolved against.
    pub fn results_dir(&self) -> PathBuf {
        self.results_dir.clone().unwrap_or_else(default_results_dir)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.summary
            .clone()
            .unwrap_or_else(|| self.results_dir().join(SUMMARY_FILE_NAME))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.results_dir().join(AGGREGATE_FILE_NAME))
    }

    /// Where to save the chart, or [`None`] if plotting was disabled.
    pub fn plot_path(&self) -> Option<PathBuf> {
        if self.skip_plot {
            return None;
        }

        Some(
            self.plot_path
                .clone()
                .unwrap_or_else(|| self.results_dir().join(PLOT_FILE_NAME)),
        )
    }
}

/// `perf_results` at the repository root, located relative to this crate.
fn default_results_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("perf_results")
}
