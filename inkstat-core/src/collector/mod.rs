//! Per-host metrics collection
//!
//! [`HostCollector`] walks one host through
//! `ResolveAddress → ProbeStableFacts → ProbeVolatileFacts` and yields a
//! [`HostSnapshot`]. Stable facts are served from the [`FactCache`] when
//! present and probed-then-stored otherwise; volatile metrics are probed
//! every time.
//!
//! Resolution and probe failures are host-local and produce
//! [`HostSnapshot::Unreachable`]. Only a cache write failure escapes as
//! [`CollectError`], because a lost fact would silently force re-probing.

mod parser;
mod snapshot;
pub mod summary;

use std::net::IpAddr;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;

pub use parser::MetricsParser;
pub use snapshot::{HostReport, HostSnapshot, StableFacts, round_display};
pub use summary::CycleSummary;

use crate::cache::{FactCache, FactKey};
use crate::config::{AppConfig, HostConfig};
use crate::error::CacheError;
use crate::probe::{
    AddressResolver, CommandRunner, ProbeCommand, ProbeError, ProbeTarget, is_local_host,
    local_hostname,
};
use crate::tracing::span_names;

/// Errors that abort collection for the whole cycle
#[derive(Debug, Error)]
pub enum CollectError {
    /// A freshly probed fact could not be persisted
    #[error("Fact cache write failed: {0}")]
    Cache(#[from] CacheError),
}

/// Where a stable fact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactSource {
    /// Served from the fact cache
    Cached,
    /// Probed this cycle and stored
    Probed,
}

/// A stable fact together with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFact {
    /// Fact value
    pub value: String,
    /// Cache hit or probe-then-store
    pub source: FactSource,
}

/// Internal failure routing: probe errors downgrade the host, cache errors abort
enum Failure {
    Probe(ProbeError),
    Cache(CacheError),
}

impl From<ProbeError> for Failure {
    fn from(err: ProbeError) -> Self {
        Self::Probe(err)
    }
}

impl From<CacheError> for Failure {
    fn from(err: CacheError) -> Self {
        Self::Cache(err)
    }
}

/// Probe command that retrieves a stable fact
#[must_use]
pub const fn probe_for(key: FactKey) -> ProbeCommand {
    match key {
        FactKey::Model => ProbeCommand::Model,
        FactKey::Os => ProbeCommand::OperatingSystem,
        FactKey::CpuModel => ProbeCommand::CpuModel,
        FactKey::Architecture => ProbeCommand::Architecture,
        FactKey::MemoryTotal => ProbeCommand::MemoryTotal,
    }
}

/// Collects snapshots for hosts, one at a time
pub struct HostCollector<R, A> {
    runner: R,
    resolver: A,
    cache: FactCache,
    identity_file: PathBuf,
    local_hostname: Option<String>,
}

impl<R: CommandRunner, A: AddressResolver> HostCollector<R, A> {
    /// Creates a collector using the configured SSH key
    ///
    /// The local hostname is looked up once here.
    #[must_use]
    pub fn new(config: &AppConfig, runner: R, resolver: A, cache: FactCache) -> Self {
        Self {
            runner,
            resolver,
            cache,
            identity_file: config.ssh_key.clone(),
            local_hostname: local_hostname(),
        }
    }

    /// Overrides the name used to recognise the local machine
    #[must_use]
    pub fn with_local_hostname(mut self, name: Option<String>) -> Self {
        self.local_hostname = name;
        self
    }

    /// The fact cache
    #[must_use]
    pub const fn cache(&self) -> &FactCache {
        &self.cache
    }

    /// The command runner
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Collects one host
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Cache`] if a probed fact cannot be persisted.
    /// Every other failure is reported as [`HostSnapshot::Unreachable`].
    pub fn collect(&mut self, host: &HostConfig) -> Result<HostSnapshot, CollectError> {
        let _span = tracing::info_span!(span_names::HOST_COLLECT, host = %host.host).entered();

        let (target, address) = match self.target_for(host) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(host = %host.host, error = %e, "Host unreachable");
                return Ok(HostSnapshot::unreachable(&host.host, Some(e.to_string())));
            }
        };
        tracing::info!(host = %host.host, %target, "Collecting host");

        match self.probe_host(host, &target, address) {
            Ok(report) => Ok(HostSnapshot::Reachable(report)),
            Err(Failure::Probe(e)) => {
                tracing::warn!(host = %host.host, error = %e, "Probe failed, host marked unreachable");
                Ok(HostSnapshot::unreachable(&host.host, Some(e.to_string())))
            }
            Err(Failure::Cache(e)) => {
                tracing::error!(host = %host.host, error = %e, "Could not persist fact");
                Err(e.into())
            }
        }
    }

    /// Looks up a stable fact: cache hit, or probe and store
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] (wrapped) if the probe fails on a miss, or
    /// [`CacheError`] (wrapped) if the probed value cannot be stored.
    fn stable_fact(
        &mut self,
        host: &str,
        target: &ProbeTarget,
        key: FactKey,
    ) -> Result<ResolvedFact, Failure> {
        if let Some(value) = self.cache.get(host, key) {
            return Ok(ResolvedFact {
                value,
                source: FactSource::Cached,
            });
        }

        let value = self.runner.run(probe_for(key), target)?;
        self.cache.put(host, key, &value)?;
        Ok(ResolvedFact {
            value,
            source: FactSource::Probed,
        })
    }

    fn target_for(
        &self,
        host: &HostConfig,
    ) -> Result<(ProbeTarget, Option<IpAddr>), crate::probe::ResolutionError> {
        if is_local_host(&host.host, self.local_hostname.as_deref()) {
            return Ok((ProbeTarget::Local, None));
        }

        let address = self.resolver.resolve_with_mdns(&host.host)?;
        tracing::info!(host = %host.host, %address, "Resolved host");
        Ok((
            ProbeTarget::Remote {
                address,
                user: host.user.clone(),
                identity_file: self.identity_file.clone(),
            },
            Some(address),
        ))
    }

    fn probe_host(
        &mut self,
        host: &HostConfig,
        target: &ProbeTarget,
        address: Option<IpAddr>,
    ) -> Result<HostReport, Failure> {
        let name = host.host.as_str();
        let mut facts = StableFacts::default();
        let mut cached = 0usize;
        for key in FactKey::ALL {
            let resolved = self.stable_fact(name, target, key)?;
            if resolved.source == FactSource::Cached {
                cached += 1;
            }
            facts.set(key, resolved.value);
        }
        tracing::debug!(host = name, cached, "Stable facts resolved");

        let load_percent = MetricsParser::parse_percent(
            ProbeCommand::CpuLoad,
            &self.runner.run(ProbeCommand::CpuLoad, target)?,
        )?;
        let temperature_celsius = MetricsParser::parse_temperature(
            &self.runner.run(ProbeCommand::CpuTemperature, target)?,
        )?;
        let used_memory_percent = MetricsParser::parse_percent(
            ProbeCommand::UsedMemoryPercent,
            &self.runner.run(ProbeCommand::UsedMemoryPercent, target)?,
        )?;

        // the local machine names itself; remote hosts keep the configured name
        let (shown_host, ip) = match address {
            Some(ip) => (host.host.clone(), ip.to_string()),
            None => (
                self.runner.run(ProbeCommand::Hostname, target)?,
                self.runner.run(ProbeCommand::IpAddress, target)?,
            ),
        };

        Ok(HostReport {
            host: shown_host,
            ip,
            facts,
            load_percent,
            temperature_celsius,
            used_memory_percent,
            collected_at: Utc::now(),
        })
    }
}
