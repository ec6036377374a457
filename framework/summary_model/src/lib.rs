use serde::Deserialize;

/// A single benchmark run, as written by the benchmark harness
///
/// One row of the `summary.csv` results file. Columns are matched by name, so the harness is
/// free to write them in any order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResultRecord {
    /// The number of actors spawned for the run
    #[serde(rename = "actors")]
    pub actor_count: u64,
    /// The number of messages each actor was sent
    #[serde(rename = "messages")]
    pub message_count: u64,
    /// The repetition index of this configuration
    #[serde(rename = "run")]
    pub run_index: i64,
    /// Exit code of the benchmark process
    ///
    /// Only `0` counts as a successful run.
    pub exit_code: i32,
    /// The number of messages the run expected to be delivered
    pub total_expected: i64,
    /// The number of messages that were actually delivered
    pub received: i64,
    /// Wall clock duration of the run, in seconds
    #[serde(rename = "elapsed_s")]
    pub elapsed_seconds: f64,
    /// Peak CPU usage sampled during the run
    ///
    /// Can exceed 100 on multi-core hosts.
    #[serde(rename = "max_cpu_pct")]
    pub max_cpu_percent: f64,
    /// Peak resident set size sampled during the run, in kilobytes
    #[serde(rename = "max_rss_kb")]
    pub max_rss_kilobytes: f64,
}

impl ResultRecord {
    /// The [GroupKey] this record is aggregated under
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            actor_count: self.actor_count,
            message_count: self.message_count,
        }
    }

    /// Whether the benchmark process exited successfully
    pub fn is_ok(&self) -> bool {
        self.exit_code == 0
    }
}

/// Identifies one benchmark configuration
///
/// Ordered by `actor_count` first, then by `message_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub actor_count: u64,
    pub message_count: u64,
}

/// Summary statistics for all runs sharing a [GroupKey]
///
/// Averages are taken over every run in the group, including the failed ones.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    pub actor_count: u64,
    pub message_count: u64,
    /// The number of runs in the group, never zero
    pub run_count: usize,
    /// The number of runs that exited with code `0`
    pub ok_run_count: usize,
    pub avg_elapsed_seconds: f64,
    pub avg_received: f64,
    pub avg_max_cpu_percent: f64,
    pub avg_max_rss_kilobytes: f64,
}

impl AggregateRecord {
    /// The [GroupKey] this aggregate was computed for
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            actor_count: self.actor_count,
            message_count: self.message_count,
        }
    }
}
