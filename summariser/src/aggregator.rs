mod report;

use std::collections::HashMap;

use itertools::Itertools;
use perf_summary_model::{AggregateRecord, GroupKey, ResultRecord};

pub use self::report::Report;

/// Aggregates benchmark results by `(actors, messages)` configuration.
pub struct ResultsAggregator;

impl ResultsAggregator {
    /// Aggregate the given results and report each [`AggregateRecord`] using the reporter, in
    /// ascending [`GroupKey`] order.
    ///
    /// Returns the aggregates that were reported.
    pub fn aggregate_into<R>(
        reporter: &mut R,
        records: Vec<ResultRecord>,
    ) -> Result<Vec<AggregateRecord>, R::Error>
    where
        R: Report,
    {
        let aggregates = Self::aggregate(records);
        for aggregate in &aggregates {
            reporter.report(aggregate)?;
        }

        Ok(aggregates)
    }

    /// Compute one [`AggregateRecord`] per [`GroupKey`], sorted by key.
    pub fn aggregate(records: Vec<ResultRecord>) -> Vec<AggregateRecord> {
        let total = records.len();
        let aggregates = Self::group_by_key(records)
            .into_iter()
            .sorted_by_key(|(key, _)| *key)
            .map(|(key, group)| Self::aggregate_group(key, &group))
            .collect::<Vec<_>>();

        log::debug!("Aggregated {total} records into {} groups", aggregates.len());

        aggregates
    }

    /// Group the records by their [`GroupKey`].
    ///
    /// Records keep their input order within a group.
    pub fn group_by_key(records: Vec<ResultRecord>) -> HashMap<GroupKey, Vec<ResultRecord>> {
        records.into_iter().into_group_map_by(|r| r.group_key())
    }

    /// Summarise a single non-empty group.
    fn aggregate_group(key: GroupKey, group: &[ResultRecord]) -> AggregateRecord {
        debug_assert!(!group.is_empty(), "groups are built from existing records");

        let run_count = group.len();
        let ok_run_count = group.iter().filter(|r| r.is_ok()).count();

        log::debug!(
            "Group actors={} messages={}: {ok_run_count}/{run_count} runs ok",
            key.actor_count,
            key.message_count
        );

        AggregateRecord {
            actor_count: key.actor_count,
            message_count: key.message_count,
            run_count,
            ok_run_count,
            avg_elapsed_seconds: mean(group, |r| r.elapsed_seconds),
            avg_received: mean(group, |r| r.received as f64),
            avg_max_cpu_percent: mean(group, |r| r.max_cpu_percent),
            avg_max_rss_kilobytes: mean(group, |r| r.max_rss_kilobytes),
        }
    }
}

/// Arithmetic mean of `field` over the group.
#[inline]
fn mean<F>(group: &[ResultRecord], field: F) -> f64
where
    F: Fn(&ResultRecord) -> f64,
{
    group.iter().map(field).sum::<f64>() / group.len() as f64
}
