//! sshuttle command line construction.
//!
//! Builds the exact shell command for a tunnel definition. Total by
//! construction: malformed extra-args degrade to pass-through text,
//! never an error.
//!
//! Shape: `sshuttle [-v] -r <user>@<host> <subnets> [--daemon] --ssh-cmd="<ssh opts>" [<extra>]`
//!
//! Debug mode swaps `--daemon` for verbose flags: `-v` on sshuttle and
//! `-vvv` on the inner ssh command. The two are mutually exclusive so a
//! debug run stays in the foreground where its output is visible.

use crate::config::TunnelDefinition;

/// Remote-login options always present in the `--ssh-cmd` payload.
const SSH_BASE: &str = "ssh -o StrictHostKeyChecking=no";

/// Split a `-i <key>` pair out of an extra-args string.
///
/// The key path is the first whitespace-delimited token after the first
/// `-i ` occurrence. Everything else (text before the flag and tokens
/// after the key path) is returned as the remaining pass-through string.
pub fn split_key_path(extra_args: &str) -> (Option<String>, String) {
    let Some(flag_pos) = extra_args.find("-i ") else {
        return (None, extra_args.trim().to_string());
    };

    let before = &extra_args[..flag_pos];
    let after_flag = extra_args[flag_pos + 3..].trim_start();

    let (key, rest) = match after_flag.find(char::is_whitespace) {
        Some(end) => (&after_flag[..end], &after_flag[end..]),
        None => (after_flag, ""),
    };

    if key.is_empty() {
        return (None, extra_args.trim().to_string());
    }

    let remainder = format!("{} {}", before.trim(), rest.trim());
    (Some(key.to_string()), remainder.trim().to_string())
}

/// Resolves tunnel definitions into runnable sshuttle command lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBuilder {
    debug: bool,
}

impl CommandBuilder {
    /// Create a builder. Debug mode is fixed for the builder's lifetime.
    pub fn new(debug: bool) -> Self {
        CommandBuilder { debug }
    }

    /// Whether this builder produces debug (foreground, verbose) commands.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Build the shell command for one tunnel definition.
    pub fn build(&self, tunnel: &TunnelDefinition) -> String {
        let (key_path, pass_through) = split_key_path(&tunnel.extra_args);

        let mut ssh_cmd = String::from(SSH_BASE);
        if let Some(key) = key_path {
            ssh_cmd.push_str(" -i ");
            ssh_cmd.push_str(&key);
        }
        if self.debug {
            ssh_cmd.push_str(" -vvv");
        }

        let subnets = tunnel.subnets.join(" ");

        let mut command = if self.debug {
            format!(
                "sshuttle -v -r {} {} --ssh-cmd=\"{}\"",
                tunnel.destination(),
                subnets,
                ssh_cmd
            )
        } else {
            format!(
                "sshuttle -r {} {} --daemon --ssh-cmd=\"{}\"",
                tunnel.destination(),
                subnets,
                ssh_cmd
            )
        };

        if !pass_through.is_empty() {
            command.push(' ');
            command.push_str(&pass_through);
        }

        command
    }
}
