//! Property tests for cycle summaries

use chrono::Utc;
use inkstat_core::collector::{CycleSummary, HostReport, HostSnapshot, StableFacts};
use proptest::prelude::*;

fn reachable(temp: i32, load: f64, memory: f64) -> HostSnapshot {
    HostSnapshot::Reachable(HostReport {
        host: "host".to_string(),
        ip: "10.0.0.1".to_string(),
        facts: StableFacts::default(),
        load_percent: load,
        temperature_celsius: temp,
        used_memory_percent: memory,
        collected_at: Utc::now(),
    })
}

#[test]
fn documented_averages() {
    let snapshots = [
        reachable(40, 10.0, 25.0),
        reachable(50, 20.0, 35.0),
        reachable(60, 30.0, 45.0),
    ];
    let summary = CycleSummary::from_snapshots(&snapshots);

    assert_eq!(summary.avg_temperature_celsius, Some(50));
    assert_eq!(summary.avg_load_percent, Some(20));
    assert_eq!(summary.avg_used_memory_percent, Some(35));
}

proptest! {
    /// Property: unreachable hosts count toward the total only
    #[test]
    fn counts_match(
        metrics in prop::collection::vec((20i32..90, 0.0f64..100.0, 0.0f64..100.0), 0..10),
        offline in 0usize..5,
    ) {
        let mut snapshots: Vec<HostSnapshot> = metrics
            .iter()
            .map(|&(t, l, m)| reachable(t, l, m))
            .collect();
        snapshots.extend((0..offline).map(|i| HostSnapshot::unreachable(format!("down{i}"), None)));

        let summary = CycleSummary::from_snapshots(&snapshots);
        prop_assert_eq!(summary.total_hosts, metrics.len() + offline);
        prop_assert_eq!(summary.accessible_hosts, metrics.len());
        prop_assert_eq!(summary.offline_hosts(), offline);
        prop_assert_eq!(summary.avg_load_percent.is_some(), !metrics.is_empty());
    }

    /// Property: averages lie between the smallest and largest sample
    #[test]
    fn averages_are_bounded(
        metrics in prop::collection::vec((20i32..90, 0.0f64..100.0, 0.0f64..100.0), 1..10),
    ) {
        let snapshots: Vec<HostSnapshot> = metrics
            .iter()
            .map(|&(t, l, m)| reachable(t, l, m))
            .collect();
        let summary = CycleSummary::from_snapshots(&snapshots);

        let temps = metrics.iter().map(|m| i64::from(m.0));
        let avg_temp = summary.avg_temperature_celsius.unwrap();
        prop_assert!(avg_temp >= temps.clone().min().unwrap());
        prop_assert!(avg_temp <= temps.max().unwrap());

        let avg_load = summary.avg_load_percent.unwrap();
        prop_assert!((0..=100).contains(&avg_load));
    }

    /// Property: identical hosts average to their own rounded value
    #[test]
    fn identical_hosts(temp in 20i32..90, load in 0.0f64..100.0, n in 1usize..8) {
        let snapshots: Vec<HostSnapshot> = (0..n).map(|_| reachable(temp, load, load)).collect();
        let summary = CycleSummary::from_snapshots(&snapshots);
        prop_assert_eq!(summary.avg_temperature_celsius, Some(i64::from(temp)));
        prop_assert_eq!(summary.avg_load_percent, Some(load.round() as i64));
    }
}
