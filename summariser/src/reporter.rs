use std::fs::File;
use std::io::Write;
use std::path::Path;

use perf_summary_model::AggregateRecord;

use crate::aggregator::Report;

/// Column names of the aggregate output, in the order they are written.
pub const AGGREGATE_HEADER: [&str; 8] = [
    "actors",
    "messages",
    "runs",
    "ok_runs",
    "avg_elapsed_s",
    "avg_received",
    "avg_max_cpu_pct",
    "avg_max_rss_kb",
];

/// A [`Report`] implementation writing aggregates as CSV.
///
/// The header is written up front, so reporting no aggregates at all still produces a valid
/// header-only file.
pub struct CsvReporter<W>
where
    W: Write,
{
    writer: csv::Writer<W>,
}

impl<W> CsvReporter<W>
where
    W: Write,
{
    /// Creates a new [`CsvReporter`] with the specified [`Write`]r and writes the header.
    pub fn new(writer: W) -> Result<Self, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        writer.write_record(AGGREGATE_HEADER)?;

        Ok(Self { writer })
    }
}

impl CsvReporter<File> {
    /// Creates a new [`CsvReporter`] writing to the file at the specified path.
    ///
    /// An existing file is truncated.
    pub fn from_file<P>(path: P) -> Result<Self, csv::Error>
    where
        P: AsRef<Path>,
    {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W> Report for CsvReporter<W>
where
    W: Write,
{
    type Error = csv::Error;

    fn report(&mut self, aggregate: &AggregateRecord) -> Result<(), Self::Error> {
        self.writer.write_record(format_row(aggregate))?;
        Ok(())
    }

    fn finish(mut self) -> Result<(), Self::Error> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Format an aggregate for output.
///
/// Elapsed time is kept to the millisecond, CPU to two decimals, and the remaining averages
/// to one.
fn format_row(aggregate: &AggregateRecord) -> [String; 8] {
    [
        aggregate.actor_count.to_string(),
        aggregate.message_count.to_string(),
        aggregate.run_count.to_string(),
        aggregate.ok_run_count.to_string(),
        format_average(aggregate.avg_elapsed_seconds, 3),
        format_average(aggregate.avg_received, 1),
        format_average(aggregate.avg_max_cpu_percent, 2),
        format_average(aggregate.avg_max_rss_kilobytes, 1),
    ]
}

/// Fixed precision, with `nan` and `inf` spelled in lower case.
fn format_average(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.precision$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate() -> AggregateRecord {
        AggregateRecord {
            actor_count: 4,
            message_count: 100,
            run_count: 3,
            ok_run_count: 2,
            avg_elapsed_seconds: 3.0,
            avg_received: 1150.0 / 3.0,
            avg_max_cpu_percent: 556.0 / 3.0,
            avg_max_rss_kilobytes: 15320.0 / 3.0,
        }
    }

    #[test]
    fn test_write_aggregates() {
        let mut buffer = Vec::new();

        let mut reporter = CsvReporter::new(&mut buffer).unwrap();
        reporter.report(&aggregate()).unwrap();
        reporter.finish().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "actors,messages,runs,ok_runs,avg_elapsed_s,avg_received,avg_max_cpu_pct,avg_max_rss_kb\n\
             4,100,3,2,3.000,383.3,185.33,5106.7\n"
        );
    }

    #[test]
    fn test_write_header_only_without_aggregates() {
        let mut buffer = Vec::new();

        let reporter = CsvReporter::new(&mut buffer).unwrap();
        reporter.finish().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, format!("{}\n", AGGREGATE_HEADER.join(",")));
    }

    #[test]
    fn test_should_overwrite_existing_file() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tempfile.path(), "stale content that is much longer than the new one\n")
            .unwrap();

        let mut reporter = CsvReporter::from_file(tempfile.path()).unwrap();
        reporter.report(&aggregate()).unwrap();
        reporter.finish().unwrap();

        let content = std::fs::read_to_string(tempfile.path()).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with("4,100,3,2,3.000,383.3,185.33,5106.7\n"));
    }

    #[test]
    fn test_should_fail_on_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("aggregate_summary.csv");

        assert!(CsvReporter::from_file(path).is_err());
    }

    #[test]
    fn test_should_write_non_finite_averages_in_lower_case() {
        let mut buffer = Vec::new();
        let aggregate = AggregateRecord {
            avg_elapsed_seconds: f64::NAN,
            avg_received: f64::INFINITY,
            avg_max_cpu_percent: f64::NEG_INFINITY,
            ..aggregate()
        };

        let mut reporter = CsvReporter::new(&mut buffer).unwrap();
        reporter.report(&aggregate).unwrap();
        reporter.finish().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().nth(1), Some("4,100,3,2,nan,inf,-inf,5106.7"));
    }
}
