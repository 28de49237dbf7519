//! SSH command construction for remote probes
//!
//! Each probe spawns its own `ssh` process in batch mode, so a missing or
//! rejected key fails fast instead of prompting.

use std::path::Path;
use std::process::Command;

/// Builds an `ssh` invocation that runs `remote_command` on `host`.
///
/// Host key confirmation is disabled and the given private key is used for
/// authentication.
///
/// # Arguments
/// * `host` - Resolved address or hostname
/// * `username` - Optional login user
/// * `identity_file` - Path to the SSH private key
/// * `connect_timeout_secs` - ssh `ConnectTimeout`; `0` leaves ssh's default
/// * `remote_command` - Shell text executed remotely
#[must_use]
pub fn build_ssh_command(
    host: &str,
    username: Option<&str>,
    identity_file: &Path,
    connect_timeout_secs: u32,
    remote_command: &str,
) -> Command {
    let mut cmd = Command::new("ssh");
    cmd.arg("-o").arg("BatchMode=yes");
    cmd.arg("-o").arg("StrictHostKeyChecking=no");
    if connect_timeout_secs > 0 {
        cmd.arg("-o")
            .arg(format!("ConnectTimeout={connect_timeout_secs}"));
    }
    cmd.arg("-i").arg(identity_file);

    let destination = match username {
        Some(user) => format!("{user}@{host}"),
        None => host.to_string(),
    };
    cmd.arg(destination);
    cmd.arg(remote_command);
    cmd
}
