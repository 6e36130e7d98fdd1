//! Launching tunnel commands through the shell.

use std::process::Command;

use tracing::debug;

use ts_common::{Error, Result};

/// Run a tunnel command via `sh -c` with inherited stdio.
///
/// Blocks until the command exits. A daemonized sshuttle returns quickly;
/// a debug-mode (foreground) run holds the terminal until interrupted.
/// Callers must have restored the terminal before invoking this.
pub fn run_command(command: &str) -> Result<()> {
    debug!(command, "launch.exec");

    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|e| Error::Launch(format!("failed to spawn shell: {}", e)))?;

    if !status.success() {
        return Err(Error::Launch(format!(
            "command exited with status {}",
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}
