//! Dashboard pages
//!
//! Every page shares a header on line 0: the configured title centered and
//! a page tag (host counter or "Summary") right-justified. The body text is
//! produced by pure formatting functions so it can be tested without a
//! display.

use crate::collector::{CycleSummary, HostReport, HostSnapshot};
use crate::display::{Justify, Placement, RenderError, Renderer};

/// Free text shown for a host that did not answer
pub const OFFLINE_BANNER: &str = "HOST OFFLINE";

/// Page tag for the summary page
pub const SUMMARY_TAG: &str = "Summary";

/// Placeholder for an average that could not be computed
const MISSING: &str = "--";

/// Body lines of a reachable host's page, starting at line 1
#[must_use]
pub fn host_lines(report: &HostReport) -> Vec<String> {
    let facts = &report.facts;
    vec![
        format!("Host: {}  -  {}", report.host, report.ip),
        format!("System: {}", facts.model),
        format!("OS: {}", facts.os),
        format!(
            "CPU: {} ({}),  {}%,  {}°C",
            facts.cpu_model,
            facts.architecture,
            report.load_display(),
            report.temperature_celsius
        ),
        format!(
            "Memory: {}MB,  {}%",
            facts.memory_total,
            report.used_memory_display()
        ),
    ]
}

/// Body lines of the summary page, starting at line 1
#[must_use]
pub fn summary_lines(summary: &CycleSummary) -> Vec<String> {
    let or_missing = |value: Option<i64>, unit: &str| {
        value.map_or_else(|| MISSING.to_string(), |v| format!("{v}{unit}"))
    };
    vec![
        format!("Online: {} / {}", summary.accessible_hosts, summary.total_hosts),
        format!("Avg CPU: {}", or_missing(summary.avg_load_percent, "%")),
        format!("Avg Temp: {}", or_missing(summary.avg_temperature_celsius, "°C")),
        format!("Avg Memory: {}", or_missing(summary.avg_used_memory_percent, "%")),
    ]
}

/// Page counter for host `index` (zero-based) of `total`
#[must_use]
pub fn page_counter(index: usize, total: usize) -> String {
    format!("{} / {total}", index + 1)
}

/// Paints dashboard pages onto a [`Renderer`]
#[derive(Debug, Clone)]
pub struct Dashboard {
    title: String,
}

impl Dashboard {
    /// Creates a dashboard with the given page title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Paints the page for host `index` of `total`
    ///
    /// Reachable hosts get their facts and metrics, unreachable hosts the
    /// offline banner. Lines that do not fit the grid are skipped.
    ///
    /// # Errors
    ///
    /// Propagates render errors other than out-of-range lines.
    pub fn paint_host(
        &self,
        renderer: &mut Renderer,
        snapshot: &HostSnapshot,
        index: usize,
        total: usize,
    ) -> Result<(), RenderError> {
        renderer.new_page();
        self.header(renderer, &page_counter(index, total))?;

        match snapshot {
            HostSnapshot::Reachable(report) => body(renderer, &host_lines(report)),
            HostSnapshot::Unreachable { host, .. } => {
                body(renderer, &[format!("Host: {host}")])?;
                renderer.write_free(OFFLINE_BANNER, Placement::Center, None);
                Ok(())
            }
        }
    }

    /// Paints the cycle summary page
    ///
    /// # Errors
    ///
    /// Propagates render errors other than out-of-range lines.
    pub fn paint_summary(
        &self,
        renderer: &mut Renderer,
        summary: &CycleSummary,
    ) -> Result<(), RenderError> {
        renderer.new_page();
        self.header(renderer, SUMMARY_TAG)?;
        body(renderer, &summary_lines(summary))
    }

    fn header(&self, renderer: &mut Renderer, tag: &str) -> Result<(), RenderError> {
        skip_out_of_range(renderer.set_line(0, &self.title, Justify::Center, None))?;
        skip_out_of_range(renderer.set_line(0, tag, Justify::Right, None))
    }
}

/// Paints every grid line with its index and vertical offset
///
/// # Errors
///
/// Propagates render errors.
pub fn paint_line_test(renderer: &mut Renderer) -> Result<(), RenderError> {
    renderer.new_page();
    let lines: Vec<_> = renderer.grid().lines().to_vec();
    for spec in lines {
        let text = format!("LINE {} - OFFSET {}", spec.index, spec.y_offset_px);
        renderer.set_line(spec.index, &text, Justify::Left, None)?;
    }
    Ok(())
}

fn body(renderer: &mut Renderer, lines: &[String]) -> Result<(), RenderError> {
    for (i, text) in lines.iter().enumerate() {
        skip_out_of_range(renderer.set_line(i + 1, text, Justify::Left, None))?;
    }
    Ok(())
}

// Short grids drop trailing lines; the renderer has already warned.
fn skip_out_of_range(result: Result<(), RenderError>) -> Result<(), RenderError> {
    match result {
        Err(RenderError::LineOutOfRange { .. }) => Ok(()),
        other => other,
    }
}
