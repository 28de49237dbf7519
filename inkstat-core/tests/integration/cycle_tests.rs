//! Full polling cycles rendered to an in-memory panel

use std::time::Duration;

use inkstat_core::cache::FactCache;
use inkstat_core::collector::{CollectError, HostCollector};
use inkstat_core::config::AppConfig;
use inkstat_core::cycle::{CycleError, Monitor};
use inkstat_core::display::{
    DriverCall, DriverHandle, EPD_2IN13_V4_SIZE, FontChoice, MemoryDriver, Renderer, Surface,
};
use inkstat_core::probe::ProbeCommand;

use super::fakes::{ScriptedRunner, TableResolver, config};

fn renderer(config: &AppConfig) -> (Renderer, DriverHandle) {
    let (driver, log) = MemoryDriver::new(EPD_2IN13_V4_SIZE);
    let surface = Surface::new(driver, config.orientation);
    let renderer = Renderer::new(surface, &config.layout(), FontChoice::from_size(config.font_size))
        .expect("default layout fits the panel");
    (renderer, log)
}

fn monitor<'a>(
    config: &'a AppConfig,
    cache: FactCache,
    resolver: TableResolver,
) -> (Monitor<'a, ScriptedRunner, TableResolver>, DriverHandle) {
    let collector = HostCollector::new(config, ScriptedRunner::web1(), resolver, cache)
        .with_local_hostname(Some("dashboard-pi".to_string()));
    let (renderer, log) = renderer(config);
    (Monitor::new(config, collector, renderer), log)
}

#[test]
fn single_host_cycle_shows_host_then_summary() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["web1"], "");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, log) = monitor(&config, FactCache::open(dir.path(), "facts"), resolver);

    let mut sleeps = Vec::new();
    let summary = monitor.run_cycle(&mut |d| sleeps.push(d)).unwrap();

    assert_eq!(summary.total_hosts, 1);
    assert_eq!(summary.accessible_hosts, 1);
    assert_eq!(summary.avg_temperature_celsius, Some(45));
    assert_eq!(summary.avg_load_percent, Some(13));
    assert_eq!(summary.avg_used_memory_percent, Some(33));

    let log = log.borrow();
    assert_eq!(log.calls, [DriverCall::DisplayFast, DriverCall::DisplayFast]);
    assert!(log.frames.iter().all(|(_, frame)| frame.iter().any(|&b| b != 0xFF)));

    assert_eq!(sleeps.len(), 2);
    for dwell in sleeps {
        assert!(dwell <= Duration::from_secs(30));
        assert!(dwell > Duration::from_secs(20));
    }
}

#[test]
fn offline_host_does_not_stop_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["ghost", "web1"], "");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, log) = monitor(&config, FactCache::open(dir.path(), "facts"), resolver);

    let summary = monitor.run_cycle(&mut |_| {}).unwrap();

    assert_eq!(summary.total_hosts, 2);
    assert_eq!(summary.accessible_hosts, 1);
    assert_eq!(summary.offline_hosts(), 1);
    assert_eq!(log.borrow().frames.len(), 3);
    assert_eq!(monitor.collector().runner().calls_for("pi@10.0.0.5"), 8);
}

#[test]
fn second_cycle_only_probes_volatile_facts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["web1"], "");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, _log) = monitor(&config, FactCache::open(dir.path(), "facts"), resolver);

    monitor.run_cycle(&mut |_| {}).unwrap();
    monitor.collector().runner().reset();
    monitor.run_cycle(&mut |_| {}).unwrap();

    assert_eq!(monitor.cycles(), 2);
    assert_eq!(
        monitor.collector().runner().calls(),
        [
            ProbeCommand::CpuLoad,
            ProbeCommand::CpuTemperature,
            ProbeCommand::UsedMemoryPercent,
        ]
    );
}

#[test]
fn maintenance_cycles_start_with_full_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), &["web1"], "full_refresh_every: 2\n");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, log) = monitor(&config, FactCache::open(dir.path(), "facts"), resolver);

    for _ in 0..3 {
        monitor.run_cycle(&mut |_| {}).unwrap();
    }

    assert_eq!(
        log.borrow().calls,
        [
            DriverCall::Display,
            DriverCall::DisplayFast,
            DriverCall::DisplayFast,
            DriverCall::DisplayFast,
            DriverCall::Display,
            DriverCall::DisplayFast,
        ]
    );
}

#[test]
fn zero_display_time_never_sleeps() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), &["web1"], "");
    config.display_time = 0;
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, _log) = monitor(&config, FactCache::open(dir.path(), "facts"), resolver);

    let mut sleeps = Vec::new();
    monitor.run_cycle(&mut |d| sleeps.push(d)).unwrap();
    assert!(sleeps.iter().all(|d| d.is_zero()));
}

#[test]
fn cache_write_failure_aborts_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let config = config(dir.path(), &["web1"], "");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, log) = monitor(&config, FactCache::open(&blocker, "facts"), resolver);

    let err = monitor.run_cycle(&mut |_| {}).unwrap_err();
    assert!(matches!(err, CycleError::Collect(CollectError::Cache(_))));
    assert!(log.borrow().frames.is_empty());
}

#[test]
fn aborted_cycle_does_not_stop_later_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-yet-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let config = config(dir.path(), &["web1"], "");
    let resolver = TableResolver::default().with("web1", [10, 0, 0, 5]);
    let (mut monitor, log) = monitor(&config, FactCache::open(&blocker, "facts"), resolver);

    let mut sleeps = Vec::new();
    assert!(monitor.run_cycle_or_log(&mut |d| sleeps.push(d)).is_none());
    assert_eq!(sleeps, [Duration::from_secs(30)]);
    assert!(log.borrow().frames.is_empty());

    std::fs::remove_file(&blocker).unwrap();
    let summary = monitor.run_cycle_or_log(&mut |_| {}).unwrap();

    assert_eq!(monitor.cycles(), 2);
    assert_eq!(summary.accessible_hosts, 1);
    assert_eq!(log.borrow().frames.len(), 2);
    assert!(blocker.join("facts.json").is_file());
}
