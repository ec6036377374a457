use std::path::{Path, PathBuf};

use anyhow::Context;
use perf_summary_model::AggregateRecord;

use crate::aggregator::{Report, ResultsAggregator};
use crate::reader::ResultsReader;
use crate::reporter::CsvReporter;

pub mod aggregator;
pub mod cli;
pub mod plot;
pub mod reader;
pub mod reporter;

/// The outcome of a summariser run.
#[derive(Debug)]
pub struct SummaryOutput {
    pub aggregates: Vec<AggregateRecord>,
    /// Where the aggregates were written
    pub output_path: PathBuf,
    /// Where the chart was saved, if one was rendered
    pub plot_path: Option<PathBuf>,
}

/// Load the results at `summary_path`, aggregate them and write the aggregates to
/// `output_path`.
///
/// The chart is rendered to `plot_path` on a best-effort basis once the aggregates are on disk.
pub fn summarise(
    summary_path: &Path,
    output_path: &Path,
    plot_path: Option<&Path>,
) -> anyhow::Result<SummaryOutput> {
    let aggregates = write_aggregates(summary_path, output_path)?;

    let plot_path =
        plot_path.and_then(|path| plot::try_plot_elapsed_vs_actors(&aggregates, path));

    Ok(SummaryOutput {
        aggregates,
        output_path: output_path.to_path_buf(),
        plot_path,
    })
}

/// Everything but the chart.
pub fn write_aggregates(
    summary_path: &Path,
    output_path: &Path,
) -> anyhow::Result<Vec<AggregateRecord>> {
    let records = ResultsReader::read_from_file(summary_path)
        .with_context(|| format!("Failed to load results from {}", summary_path.display()))?;
    log::debug!("Loaded {} result records", records.len());

    let mut reporter = CsvReporter::from_file(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let aggregates = ResultsAggregator::aggregate_into(&mut reporter, records)
        .context("Failed to write aggregate row")?;
    reporter
        .finish()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if aggregates.is_empty() {
        log::warn!(
            "No result records in {}, wrote header only",
            summary_path.display()
        );
    }
    log::info!("Wrote aggregate summary to {}", output_path.display());

    Ok(aggregates)
}
