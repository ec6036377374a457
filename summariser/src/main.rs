#[macro_use]
extern crate log;

use clap::Parser as _;
use perf_summariser::cli::CliArgs;
use perf_summariser::reader::ResultsReadError;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    debug!("{CRATE_NAME} {CRATE_VERSION}");

    let summary_path = args.summary_path();
    if !summary_path.exists() {
        return Err(ResultsReadError::NotFound { path: summary_path }.into());
    }

    let output_path = args.output_path();
    let plot_path = args.plot_path();
    debug!("Using results file: {}", summary_path.display());
    debug!("Using aggregate output file: {}", output_path.display());

    let output = perf_summariser::summarise(&summary_path, &output_path, plot_path.as_deref())?;

    debug!(
        "Summarised {} configurations, chart: {:?}",
        output.aggregates.len(),
        output.plot_path
    );

    Ok(())
}
