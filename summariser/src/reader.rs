use std::io::Read;
use std::path::{Path, PathBuf};

use perf_summary_model::ResultRecord;

/// Reads the benchmark harness `summary.csv` into [`ResultRecord`]s.
#[derive(Debug)]
pub struct ResultsReader;

impl ResultsReader {
    /// Parses CSV results with a header row from the given reader, in file order.
    ///
    /// Any row that fails to parse fails the whole read.
    pub fn read<R>(reader: R) -> Result<Vec<ResultRecord>, ResultsReadError>
    where
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for record in csv_reader.deserialize::<ResultRecord>() {
            records.push(record?);
        }

        Ok(records)
    }

    /// Parses CSV results from the file at the specified path.
    pub fn read_from_file<P>(path: P) -> Result<Vec<ResultRecord>, ResultsReadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ResultsReadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ResultsReadError::Io(e),
        })?;

        let records = Self::read(file)?;
        log::debug!("Read {} result records from {}", records.len(), path.display());

        Ok(records)
    }
}

/// An error type for [`ResultsReader`].
#[derive(Debug, thiserror::Error)]
pub enum ResultsReadError {
    #[error("No summary.csv found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("An error occurred while reading the results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed results row: {0}")]
    Csv(#[from] csv::Error),
}
