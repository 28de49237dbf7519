//! Per-host snapshot types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::FactKey;

/// Stable facts of a host, served from the fact cache after first probe
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StableFacts {
    /// Hardware model (e.g. "Raspberry Pi 4 Model B Rev 1.4")
    pub model: String,
    /// Operating system pretty name
    pub os: String,
    /// CPU model name (e.g. "Cortex-A72")
    pub cpu_model: String,
    /// Machine architecture (e.g. "aarch64")
    pub architecture: String,
    /// Total memory in MB, as reported
    pub memory_total: String,
}

impl StableFacts {
    /// Returns the value of `key`
    #[must_use]
    pub fn get(&self, key: FactKey) -> &str {
        match key {
            FactKey::Model => &self.model,
            FactKey::Os => &self.os,
            FactKey::CpuModel => &self.cpu_model,
            FactKey::Architecture => &self.architecture,
            FactKey::MemoryTotal => &self.memory_total,
        }
    }

    /// Replaces the value of `key`
    pub fn set(&mut self, key: FactKey, value: String) {
        let slot = match key {
            FactKey::Model => &mut self.model,
            FactKey::Os => &mut self.os,
            FactKey::CpuModel => &mut self.cpu_model,
            FactKey::Architecture => &mut self.architecture,
            FactKey::MemoryTotal => &mut self.memory_total,
        };
        *slot = value;
    }
}

/// Metrics of a host that answered every probe this cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReport {
    /// Host name as configured, or as reported by the local machine
    pub host: String,
    /// Address the host was reached at
    pub ip: String,
    /// Cached or freshly probed stable facts
    pub facts: StableFacts,
    /// CPU busy percentage
    pub load_percent: f64,
    /// CPU temperature in whole degrees Celsius
    pub temperature_celsius: i32,
    /// Used memory percentage
    pub used_memory_percent: f64,
    /// When the volatile metrics were sampled
    pub collected_at: DateTime<Utc>,
}

impl HostReport {
    /// CPU load rounded for display
    #[must_use]
    pub fn load_display(&self) -> i64 {
        round_display(self.load_percent)
    }

    /// Used memory rounded for display
    #[must_use]
    pub fn used_memory_display(&self) -> i64 {
        round_display(self.used_memory_percent)
    }
}

/// Outcome of collecting one host for one cycle
#[derive(Debug, Clone, PartialEq)]
pub enum HostSnapshot {
    /// The host could not be resolved or a probe failed
    Unreachable {
        /// Host name as configured
        host: String,
        /// Why the host is considered unreachable
        cause: Option<String>,
    },
    /// Every probe succeeded
    Reachable(HostReport),
}

impl HostSnapshot {
    /// Creates an unreachable snapshot
    #[must_use]
    pub fn unreachable(host: impl Into<String>, cause: Option<String>) -> Self {
        Self::Unreachable {
            host: host.into(),
            cause,
        }
    }

    /// Host name as configured
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::Unreachable { host, .. } => host,
            Self::Reachable(report) => &report.host,
        }
    }

    /// Returns whether the host answered
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    /// The report, if reachable
    #[must_use]
    pub const fn report(&self) -> Option<&HostReport> {
        match self {
            Self::Reachable(report) => Some(report),
            Self::Unreachable { .. } => None,
        }
    }
}

impl fmt::Display for HostSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable {
                host,
                cause: Some(cause),
            } => write!(f, "{host}: unreachable ({cause})"),
            Self::Unreachable { host, cause: None } => write!(f, "{host}: unreachable"),
            Self::Reachable(r) => write!(
                f,
                "{}: load {}%, {}°C, memory {}%",
                r.host,
                r.load_display(),
                r.temperature_celsius,
                r.used_memory_display()
            ),
        }
    }
}

/// Rounds half away from zero for display
#[must_use]
pub fn round_display(value: f64) -> i64 {
    value.round() as i64
}
