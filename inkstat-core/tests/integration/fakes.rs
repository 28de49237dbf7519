//! Scripted collaborators shared by the integration tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use inkstat_core::config::{AppConfig, parse_config};
use inkstat_core::probe::{
    AddressResolver, CommandRunner, ProbeCommand, ProbeError, ProbeResult, ProbeTarget,
    ResolutionError,
};

/// Runner answering each probe from a fixed table and recording calls
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: HashMap<ProbeCommand, String>,
    calls: RefCell<Vec<(ProbeCommand, String)>>,
}

impl ScriptedRunner {
    pub fn with(mut self, command: ProbeCommand, output: &str) -> Self {
        self.outputs.insert(command, output.to_string());
        self
    }

    /// Canned values for a healthy Raspberry Pi
    pub fn web1() -> Self {
        Self::default()
            .with(ProbeCommand::Model, "RPi4")
            .with(ProbeCommand::OperatingSystem, "Debian GNU/Linux 12 (bookworm)")
            .with(ProbeCommand::CpuModel, "Cortex-A72")
            .with(ProbeCommand::Architecture, "aarch64")
            .with(ProbeCommand::MemoryTotal, "3794")
            .with(ProbeCommand::CpuLoad, "12.5")
            .with(ProbeCommand::CpuTemperature, "45000")
            .with(ProbeCommand::UsedMemoryPercent, "33.0")
    }

    pub fn calls(&self) -> Vec<ProbeCommand> {
        self.calls.borrow().iter().map(|(c, _)| *c).collect()
    }

    pub fn calls_for(&self, target: &str) -> usize {
        self.calls.borrow().iter().filter(|(_, t)| t == target).count()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: ProbeCommand, target: &ProbeTarget) -> ProbeResult<String> {
        self.calls.borrow_mut().push((command, target.to_string()));
        self.outputs
            .get(&command)
            .cloned()
            .ok_or_else(|| ProbeError::Failed {
                command,
                status: "exit status: 255".to_string(),
                stderr: "ssh: connect to host: Connection refused".to_string(),
            })
    }
}

/// Resolver with a fixed name table
#[derive(Default)]
pub struct TableResolver(HashMap<String, IpAddr>);

impl TableResolver {
    pub fn with(mut self, host: &str, ip: [u8; 4]) -> Self {
        self.0.insert(host.to_string(), IpAddr::from(ip));
        self
    }
}

impl AddressResolver for TableResolver {
    fn resolve(&self, host: &str) -> Result<IpAddr, ResolutionError> {
        self.0.get(host).copied().ok_or_else(|| ResolutionError {
            host: host.to_string(),
            reason: "Name or service not known".to_string(),
        })
    }
}

/// Parses a configuration for `hosts` with the key inside `dir`
pub fn config(dir: &Path, hosts: &[&str], extra: &str) -> AppConfig {
    let servers: String = hosts
        .iter()
        .map(|h| format!("  - host: {h}\n    user: pi\n"))
        .collect();
    parse_config(&format!(
        "servers:\n{servers}display_title: Servers\ndisplay_time: 30\nssh_key: {}\n{extra}",
        dir.join("id_ed25519").display()
    ))
    .expect("test configuration should parse")
}
