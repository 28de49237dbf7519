//! Polling cycle
//!
//! One cycle visits every configured host in order, shows its page for the
//! configured dwell time, then shows the summary page. Sleeping is injected
//! so cycles can run without wall-clock delays.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::collector::{CollectError, CycleSummary, HostCollector, HostSnapshot};
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::display::{RefreshMode, RenderError, Renderer};
use crate::probe::{AddressResolver, CommandRunner};
use crate::tracing::span_names;

/// Errors that abort a cycle
#[derive(Debug, Error)]
pub enum CycleError {
    /// Host collection failed beyond a single host
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// The display failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Time left to show a page after `elapsed` was spent producing it
///
/// Saturates at zero when collection took longer than the dwell time.
#[must_use]
pub fn remaining_dwell(display_time: Duration, elapsed: Duration) -> Duration {
    display_time.saturating_sub(elapsed)
}

/// Runs polling cycles against a renderer
pub struct Monitor<'a, R, A> {
    config: &'a AppConfig,
    collector: HostCollector<R, A>,
    renderer: Renderer,
    dashboard: Dashboard,
    cycles: u64,
}

impl<'a, R: CommandRunner, A: AddressResolver> Monitor<'a, R, A> {
    /// Creates a monitor; `renderer` should already be initialized
    #[must_use]
    pub fn new(config: &'a AppConfig, collector: HostCollector<R, A>, renderer: Renderer) -> Self {
        Self {
            config,
            collector,
            renderer,
            dashboard: Dashboard::new(config.display_title.clone()),
            cycles: 0,
        }
    }

    /// Cycles completed or attempted so far
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The renderer
    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The collector
    #[must_use]
    pub const fn collector(&self) -> &HostCollector<R, A> {
        &self.collector
    }

    /// Runs one full cycle and returns its summary
    ///
    /// On a maintenance cycle the first page is pushed with a full refresh;
    /// every other page uses the fast waveform.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if the fact cache cannot be written or the
    /// display fails. Unreachable hosts do not abort the cycle.
    pub fn run_cycle(
        &mut self,
        sleep: &mut dyn FnMut(Duration),
    ) -> Result<CycleSummary, CycleError> {
        let cycle = self.cycles;
        self.cycles += 1;
        let maintenance = self.config.is_maintenance_cycle(cycle);
        let _span = tracing::info_span!(span_names::CYCLE_RUN, cycle, maintenance).entered();
        tracing::info!(hosts = self.config.servers.len(), "Starting cycle");

        let total = self.config.servers.len();
        let dwell = self.config.display_duration();
        let mut snapshots: Vec<HostSnapshot> = Vec::with_capacity(total);
        let mut first_page = true;

        for (index, host) in self.config.servers.iter().enumerate() {
            let started = Instant::now();
            let snapshot = self.collector.collect(host)?;
            self.dashboard
                .paint_host(&mut self.renderer, &snapshot, index, total)?;
            self.renderer
                .flush(page_refresh(maintenance, &mut first_page))?;

            let elapsed = started.elapsed();
            tracing::debug!(
                host = %host.host,
                reachable = snapshot.is_reachable(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Page shown"
            );
            sleep(remaining_dwell(dwell, elapsed));
            snapshots.push(snapshot);
        }

        let started = Instant::now();
        let summary = CycleSummary::from_snapshots(&snapshots);
        self.dashboard.paint_summary(&mut self.renderer, &summary)?;
        self.renderer
            .flush(page_refresh(maintenance, &mut first_page))?;
        tracing::info!(
            online = summary.accessible_hosts,
            total = summary.total_hosts,
            "Cycle complete"
        );
        sleep(remaining_dwell(dwell, started.elapsed()));

        Ok(summary)
    }

    /// Runs one cycle and logs an abort instead of returning it
    ///
    /// An aborted cycle still waits one dwell period before returning.
    pub fn run_cycle_or_log(&mut self, sleep: &mut dyn FnMut(Duration)) -> Option<CycleSummary> {
        match self.run_cycle(sleep) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(
                    cycle = self.cycles.saturating_sub(1),
                    error = %e,
                    "Cycle aborted, continuing with the next cycle"
                );
                sleep(self.config.display_duration());
                None
            }
        }
    }
}

fn page_refresh(maintenance: bool, first_page: &mut bool) -> RefreshMode {
    let full = maintenance && *first_page;
    *first_page = false;
    if full { RefreshMode::Full } else { RefreshMode::Fast }
}
