//! Parsing of volatile probe output

use crate::probe::{ProbeCommand, ProbeError, ProbeResult};

/// Stateless parser for the numeric probes
pub struct MetricsParser;

impl MetricsParser {
    /// Parses a percentage such as `"12.5"`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidOutput`] for non-numeric or non-finite text.
    pub fn parse_percent(command: ProbeCommand, output: &str) -> ProbeResult<f64> {
        let trimmed = output.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(invalid(command, trimmed, "not a finite number")),
            Err(e) => Err(invalid(command, trimmed, &e.to_string())),
        }
    }

    /// Converts a thermal-zone reading in milli-degrees to whole degrees
    ///
    /// `45000` becomes `45`; `45500` rounds to `46`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidOutput`] if the reading is not an integer.
    pub fn parse_temperature(output: &str) -> ProbeResult<i32> {
        let trimmed = output.trim();
        let milli: i64 = trimmed.parse().map_err(|e: std::num::ParseIntError| {
            invalid(ProbeCommand::CpuTemperature, trimmed, &e.to_string())
        })?;
        Ok((milli as f64 / 1000.0).round() as i32)
    }
}

fn invalid(command: ProbeCommand, output: &str, reason: &str) -> ProbeError {
    ProbeError::InvalidOutput {
        command,
        output: output.to_string(),
        reason: reason.to_string(),
    }
}
