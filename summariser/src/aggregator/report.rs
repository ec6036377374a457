use perf_summary_model::AggregateRecord;

/// A trait for reporting aggregated results.
pub trait Report {
    type Error;

    /// Report a single [`AggregateRecord`].
    fn report(&mut self, aggregate: &AggregateRecord) -> Result<(), Self::Error>;

    /// Flush anything buffered once all aggregates have been reported.
    fn finish(self) -> Result<(), Self::Error>;
}
