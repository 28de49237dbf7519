//! Host probing
//!
//! A fixed vocabulary of shell commands ([`ProbeCommand`]) is executed
//! against a [`ProbeTarget`], either directly on this machine or through
//! `ssh` with a private key. The [`CommandRunner`] trait is the seam the
//! collector depends on; [`ShellProbe`] is the process-spawning
//! implementation.

pub mod resolve;
mod ssh;

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use thiserror::Error;

pub use resolve::{AddressResolver, ResolutionError, SystemResolver, is_local_host, local_hostname};
pub use ssh::build_ssh_command;

/// Errors raised while running a probe command
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The process could not be started
    #[error("Failed to spawn `{program}` for {command}: {reason}")]
    Spawn {
        /// Program that failed to start (`sh` or `ssh`)
        program: &'static str,
        /// Probe being run
        command: ProbeCommand,
        /// Underlying error text
        reason: String,
    },

    /// The command exited unsuccessfully
    #[error("{command} failed ({status}): {stderr}")]
    Failed {
        /// Probe being run
        command: ProbeCommand,
        /// Exit status description
        status: String,
        /// Trimmed standard error
        stderr: String,
    },

    /// The command produced output that could not be used
    #[error("{command} returned unusable output {output:?}: {reason}")]
    InvalidOutput {
        /// Probe being run
        command: ProbeCommand,
        /// Raw (trimmed) output
        output: String,
        /// Why the output was rejected
        reason: String,
    },
}

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// The fixed set of metric-retrieval commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeCommand {
    /// Short hostname
    Hostname,
    /// Primary IPv4 address
    IpAddress,
    /// Hardware model (device tree, falling back to DMI)
    Model,
    /// Operating system pretty name
    OperatingSystem,
    /// CPU model name
    CpuModel,
    /// Machine architecture
    Architecture,
    /// CPU busy percentage
    CpuLoad,
    /// CPU temperature in milli-degrees Celsius
    CpuTemperature,
    /// Total memory in MB
    MemoryTotal,
    /// Used memory percentage
    UsedMemoryPercent,
}

impl ProbeCommand {
    /// Shell text executed for this probe
    #[must_use]
    pub const fn shell(self) -> &'static str {
        match self {
            Self::Hostname => "hostname",
            Self::IpAddress => "hostname -I | awk '{print $1}'",
            Self::Model => concat!(
                "tr -d '\\0' < /sys/firmware/devicetree/base/model 2>/dev/null",
                " || cat /sys/class/dmi/id/product_name",
            ),
            Self::OperatingSystem => "grep '^PRETTY_NAME=' /etc/os-release | cut -d '\"' -f 2",
            Self::CpuModel => {
                "lscpu | grep -m1 -E '^Model name:' | cut -d ':' -f 2 | sed 's/^ *//'"
            }
            Self::Architecture => "uname -m",
            Self::CpuLoad => "top -bn1 | awk '/^%?Cpu/ {print 100 - $8; exit}'",
            Self::CpuTemperature => "cat /sys/class/thermal/thermal_zone0/temp",
            Self::MemoryTotal => "free -m | awk '/^Mem:/ {print $2}'",
            Self::UsedMemoryPercent => "free | awk '/^Mem:/ {print $3 / $2 * 100.0}'",
        }
    }

    /// Short name used in logs and errors
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hostname => "hostname",
            Self::IpAddress => "ip_address",
            Self::Model => "model",
            Self::OperatingSystem => "os",
            Self::CpuModel => "cpu_model",
            Self::Architecture => "architecture",
            Self::CpuLoad => "cpu_load",
            Self::CpuTemperature => "cpu_temperature",
            Self::MemoryTotal => "memory_total",
            Self::UsedMemoryPercent => "used_memory_percent",
        }
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a probe runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeTarget {
    /// This machine, without ssh
    Local,
    /// A remote host reached over ssh
    Remote {
        /// Resolved address
        address: IpAddr,
        /// Login user; ssh's default when `None`
        user: Option<String>,
        /// Private key passed with `-i`
        identity_file: PathBuf,
    },
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote {
                address,
                user: Some(user),
                ..
            } => write!(f, "{user}@{address}"),
            Self::Remote { address, .. } => write!(f, "{address}"),
        }
    }
}

/// Executes probe commands and returns their trimmed stdout
pub trait CommandRunner {
    /// Runs `command` on `target`
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the command cannot be executed or exits
    /// unsuccessfully.
    fn run(&self, command: ProbeCommand, target: &ProbeTarget) -> ProbeResult<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: ProbeCommand, target: &ProbeTarget) -> ProbeResult<String> {
        (**self).run(command, target)
    }
}

/// Runs probes by spawning `sh` locally or `ssh` remotely
///
/// No timeout is applied to the remote command itself; ssh's
/// `ConnectTimeout` only bounds connection setup.
#[derive(Debug, Clone)]
pub struct ShellProbe {
    connect_timeout_secs: u32,
}

impl ShellProbe {
    /// Creates a runner with the given ssh connection timeout
    #[must_use]
    pub const fn new(connect_timeout_secs: u32) -> Self {
        Self {
            connect_timeout_secs,
        }
    }
}

impl Default for ShellProbe {
    fn default() -> Self {
        Self::new(5)
    }
}

impl CommandRunner for ShellProbe {
    fn run(&self, command: ProbeCommand, target: &ProbeTarget) -> ProbeResult<String> {
        let (program, mut cmd) = match target {
            ProbeTarget::Local => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command.shell());
                ("sh", cmd)
            }
            ProbeTarget::Remote {
                address,
                user,
                identity_file,
            } => (
                "ssh",
                build_ssh_command(
                    &address.to_string(),
                    user.as_deref(),
                    identity_file,
                    self.connect_timeout_secs,
                    command.shell(),
                ),
            ),
        };

        tracing::info!(%command, %target, "Running probe");
        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ProbeError::Spawn {
                program,
                command,
                reason: e.to_string(),
            })?;

        let result = stdout_of(command, &output)?;
        tracing::debug!(%command, output = %result, "Probe returned");
        Ok(result)
    }
}

fn stdout_of(command: ProbeCommand, output: &Output) -> ProbeResult<String> {
    if !output.status.success() {
        return Err(ProbeError::Failed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout.clone())
        .map(|s| s.trim().to_string())
        .map_err(|e| ProbeError::InvalidOutput {
            command,
            output: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            reason: format!("invalid UTF-8: {e}"),
        })
}
