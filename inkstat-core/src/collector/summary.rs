//! Cycle-wide aggregation for the summary page

use super::snapshot::{HostSnapshot, round_display};

/// Averages over the hosts that were reachable this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSummary {
    /// Hosts visited this cycle
    pub total_hosts: usize,
    /// Hosts that produced a report
    pub accessible_hosts: usize,
    /// Mean CPU temperature in °C, rounded
    pub avg_temperature_celsius: Option<i64>,
    /// Mean CPU load in percent, rounded
    pub avg_load_percent: Option<i64>,
    /// Mean used memory in percent, rounded
    pub avg_used_memory_percent: Option<i64>,
}

impl CycleSummary {
    /// Aggregates a cycle's snapshots
    ///
    /// Averages are computed from the unrounded metrics and rounded once;
    /// they are `None` when no host was reachable.
    #[must_use]
    pub fn from_snapshots(snapshots: &[HostSnapshot]) -> Self {
        let reports: Vec<_> = snapshots.iter().filter_map(HostSnapshot::report).collect();

        let mean = |values: Vec<f64>| -> Option<i64> {
            if values.is_empty() {
                None
            } else {
                Some(round_display(values.iter().sum::<f64>() / values.len() as f64))
            }
        };

        Self {
            total_hosts: snapshots.len(),
            accessible_hosts: reports.len(),
            avg_temperature_celsius: mean(
                reports
                    .iter()
                    .map(|r| f64::from(r.temperature_celsius))
                    .collect(),
            ),
            avg_load_percent: mean(reports.iter().map(|r| r.load_percent).collect()),
            avg_used_memory_percent: mean(
                reports.iter().map(|r| r.used_memory_percent).collect(),
            ),
        }
    }

    /// Hosts that were not reachable
    #[must_use]
    pub const fn offline_hosts(&self) -> usize {
        self.total_hosts.saturating_sub(self.accessible_hosts)
    }
}
