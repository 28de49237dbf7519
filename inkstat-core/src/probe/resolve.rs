//! Host address resolution
//!
//! Hosts are resolved by name first and then as `<host>.local` (mDNS), so
//! Raspberry Pis on a home network work without DNS entries.

use std::net::{IpAddr, ToSocketAddrs};

use thiserror::Error;

/// Error returned when a host name cannot be resolved
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to resolve host '{host}': {reason}")]
pub struct ResolutionError {
    /// The hostname that failed to resolve
    pub host: String,
    /// The reason for the failure
    pub reason: String,
}

/// Resolves host names to addresses
pub trait AddressResolver {
    /// Resolves `host` to a single address
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the name has no address.
    fn resolve(&self, host: &str) -> Result<IpAddr, ResolutionError>;

    /// Resolves `host`, then `<host>.local`
    ///
    /// # Errors
    ///
    /// Returns the error of the `.local` attempt when both fail.
    fn resolve_with_mdns(&self, host: &str) -> Result<IpAddr, ResolutionError> {
        self.resolve(host).or_else(|first| {
            tracing::debug!(host, error = %first, "Direct resolution failed, trying .local");
            self.resolve(&format!("{host}.local"))
        })
    }
}

impl<A: AddressResolver + ?Sized> AddressResolver for &A {
    fn resolve(&self, host: &str) -> Result<IpAddr, ResolutionError> {
        (**self).resolve(host)
    }
}

/// Resolver backed by the system resolver (`getaddrinfo`)
///
/// IPv4 addresses are preferred when a name has several.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn resolve(&self, host: &str) -> Result<IpAddr, ResolutionError> {
        let addrs: Vec<IpAddr> = (host, 0)
            .to_socket_addrs()
            .map_err(|e| ResolutionError {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .map(|addr| addr.ip())
            .collect();

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| ResolutionError {
                host: host.to_string(),
                reason: "No addresses found".to_string(),
            })
    }
}

/// Returns this machine's hostname, if it can be determined
#[must_use]
pub fn local_hostname() -> Option<String> {
    match hostname::get() {
        Ok(name) => Some(name.to_string_lossy().into_owned()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine local hostname");
            None
        }
    }
}

/// Returns whether `host` names this machine
#[must_use]
pub fn is_local_host(host: &str, local: Option<&str>) -> bool {
    host.eq_ignore_ascii_case("localhost") || local.is_some_and(|l| l.eq_ignore_ascii_case(host))
}
