//! Collector behaviour against scripted probes and a real cache file

use inkstat_core::cache::{FactCache, FactKey};
use inkstat_core::collector::{HostCollector, HostSnapshot};
use inkstat_core::config::HostConfig;
use inkstat_core::probe::ProbeCommand;

use super::fakes::{ScriptedRunner, TableResolver, config};

#[test]
fn web1_end_to_end_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["web1"], "");
    let cache = FactCache::open(dir.path().join("cache"), "facts");
    let mut collector = HostCollector::new(
        &config,
        ScriptedRunner::web1(),
        TableResolver::default().with("web1", [10, 0, 0, 5]),
        cache,
    )
    .with_local_hostname(Some("dashboard-pi".to_string()));

    let snapshot = collector.collect(&config.servers[0]).unwrap();
    let HostSnapshot::Reachable(report) = snapshot else {
        panic!("web1 should be reachable");
    };

    assert_eq!(report.host, "web1");
    assert_eq!(report.ip, "10.0.0.5");
    assert_eq!(report.facts.model, "RPi4");
    assert_eq!(report.temperature_celsius, 45);
    assert!((report.used_memory_percent - 33.0).abs() < f64::EPSILON);
    assert!((report.load_percent - 12.5).abs() < f64::EPSILON);
    assert_eq!(report.load_display(), 13);
    assert_eq!(report.used_memory_display(), 33);
}

#[test]
fn mdns_fallback_resolves_dot_local() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["pi-two"], "");
    let mut collector = HostCollector::new(
        &config,
        ScriptedRunner::web1(),
        TableResolver::default().with("pi-two.local", [192, 168, 1, 20]),
        FactCache::open(dir.path(), "facts"),
    )
    .with_local_hostname(None);

    let snapshot = collector.collect(&HostConfig::new("pi-two", Some("pi".into()))).unwrap();
    assert_eq!(snapshot.report().unwrap().ip, "192.168.1.20");
    assert_eq!(collector.runner().calls_for("pi@192.168.1.20"), 8);
}

#[test]
fn unresolvable_host_issues_zero_probes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["ghost"], "");
    let mut collector = HostCollector::new(
        &config,
        ScriptedRunner::web1(),
        TableResolver::default(),
        FactCache::open(dir.path(), "facts"),
    )
    .with_local_hostname(None);

    let snapshot = collector.collect(&config.servers[0]).unwrap();
    assert_eq!(snapshot, HostSnapshot::Unreachable {
        host: "ghost".to_string(),
        cause: Some("Failed to resolve host 'ghost.local': Name or service not known".to_string()),
    });
    assert!(collector.runner().calls().is_empty());
}

#[test]
fn facts_cached_by_previous_process_skip_stable_probes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["web1"], "");
    {
        let mut first = HostCollector::new(
            &config,
            ScriptedRunner::web1(),
            TableResolver::default().with("web1", [10, 0, 0, 5]),
            FactCache::open(dir.path(), "facts"),
        )
        .with_local_hostname(None);
        first.collect(&config.servers[0]).unwrap();
        assert_eq!(first.cache().len(), FactKey::ALL.len());
    }

    let mut second = HostCollector::new(
        &config,
        ScriptedRunner::web1(),
        TableResolver::default().with("web1", [10, 0, 0, 5]),
        FactCache::open(dir.path(), "facts"),
    )
    .with_local_hostname(None);
    let snapshot = second.collect(&config.servers[0]).unwrap();

    assert_eq!(snapshot.report().unwrap().facts.cpu_model, "Cortex-A72");
    assert_eq!(
        second.runner().calls(),
        [
            ProbeCommand::CpuLoad,
            ProbeCommand::CpuTemperature,
            ProbeCommand::UsedMemoryPercent,
        ]
    );
}
