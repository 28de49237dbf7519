//! Polling loop.

use std::path::Path;
use std::thread;

use inkstat_core::cache::FactCache;
use inkstat_core::collector::HostCollector;
use inkstat_core::cycle::Monitor;
use inkstat_core::error::InkstatError;
use inkstat_core::probe::{ShellProbe, SystemResolver};

use crate::error::CliError;
use crate::util::{load_config, open_renderer};

/// Runs cycles until interrupted, or a single cycle with `once`.
///
/// Only a `once` cycle reports an abort; the polling loop logs it and moves on.
pub fn cmd_run(config_path: Option<&Path>, output: &Path, once: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let renderer = open_renderer(&config, output)?;

    let cache = FactCache::open(&config.cache_dir, &config.cache_name);
    tracing::info!(path = %cache.path().display(), entries = cache.len(), "Fact cache opened");

    let collector = HostCollector::new(
        &config,
        ShellProbe::new(config.connect_timeout_secs),
        SystemResolver,
        cache,
    );
    let mut monitor = Monitor::new(&config, collector, renderer);
    let mut sleep = thread::sleep;

    if once {
        let summary = monitor.run_cycle(&mut sleep).map_err(InkstatError::from)?;
        println!(
            "{} / {} hosts online",
            summary.accessible_hosts, summary.total_hosts
        );
        return Ok(());
    }

    loop {
        monitor.run_cycle_or_log(&mut sleep);
    }
}
