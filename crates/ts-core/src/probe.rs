//! SSH connectivity probe for new tunnel definitions.
//!
//! Runs a batch-mode `ssh ... exit` against the target before a
//! definition is saved, so typos in host or key path surface early.
//! BatchMode keeps the probe non-interactive: a host that would prompt
//! for a password counts as a failure.

use std::process::{Command, Stdio};

use tracing::debug;

use ts_common::{Error, Result};

use crate::command::split_key_path;

/// Build the argument vector for the probe command.
///
/// A `-i <key>` pair in the extra-args is forwarded to the probe; other
/// extra arguments are sshuttle flags and do not apply to plain ssh.
pub fn probe_args(user: &str, host: &str, extra_args: &str) -> Vec<String> {
    let mut args: Vec<String> = [
        "-o",
        "ConnectTimeout=10",
        "-o",
        "BatchMode=yes",
        "-o",
        "StrictHostKeyChecking=no",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let (key_path, _) = split_key_path(extra_args);
    if let Some(key) = key_path {
        args.push("-i".to_string());
        args.push(key);
    }

    args.push(format!("{}@{}", user, host));
    args.push("exit".to_string());
    args
}

/// Probe SSH connectivity to `user@host`.
///
/// Output is discarded; only the exit status matters.
pub fn check_ssh(user: &str, host: &str, extra_args: &str) -> Result<()> {
    let args = probe_args(user, host, extra_args);
    debug!(user, host, "probe.ssh_check");

    let status = Command::new("ssh")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| Error::Probe(format!("failed to run ssh: {}", e)))?;

    if !status.success() {
        return Err(Error::Probe(format!(
            "ssh exited with status {}",
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}
