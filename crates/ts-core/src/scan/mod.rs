//! Active sshuttle session discovery via the process table.
//!
//! Runs `ps aux` and extracts one [`ActiveSession`] per line that looks
//! like a running sshuttle tunnel. Parsing is tolerant: malformed lines
//! are skipped, never fatal. Only spawning or running `ps` itself can
//! fail.

use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use ts_common::ProcessId;

/// Destination extraction pattern. Greedy, so the last `-r` wins.
const DEST_PATTERN: &str = r"sshuttle.*-r\s+(\S+)";

/// Destination shown when a session line has no parseable `-r` argument.
pub const UNKNOWN_DESTINATION: &str = "unknown";

fn dest_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DEST_PATTERN).unwrap_or_else(|e| panic!("bad pattern: {}", e)))
}

/// Errors from running the process table scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// `ps` could not be spawned at all.
    #[error("failed to spawn ps: {0}")]
    Spawn(String),

    /// `ps` ran but exited non-zero.
    #[error("ps exited with status {status}: {stderr}")]
    ToolFailed {
        /// Exit code, -1 when killed by a signal.
        status: i32,
        /// Trimmed stderr from ps.
        stderr: String,
    },
}

impl From<ScanError> for ts_common::Error {
    fn from(e: ScanError) -> Self {
        ts_common::Error::Scan(e.to_string())
    }
}

/// A running sshuttle tunnel discovered in the process table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    /// Process ID from the second ps column.
    pub pid: ProcessId,
    /// `user@host` destination, or [`UNKNOWN_DESTINATION`].
    pub destination: String,
    /// The full ps line, unmodified.
    pub raw_line: String,
}

/// Parse `ps aux` output into active sessions.
///
/// A line qualifies when it contains both `sshuttle` and `-r`. The pid
/// comes from the second whitespace-separated field; lines where that
/// field is not a positive integer are skipped.
pub fn parse_process_table(output: &str) -> Vec<ActiveSession> {
    let mut sessions = Vec::new();

    for line in output.lines() {
        if !(line.contains("sshuttle") && line.contains("-r")) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            continue;
        }

        let Some(pid) = fields[1].parse::<u32>().ok().filter(|p| *p > 0) else {
            debug!(field = fields[1], "scan.skip_non_numeric_pid");
            continue;
        };

        let destination = dest_regex()
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string());

        sessions.push(ActiveSession {
            pid: ProcessId(pid),
            destination,
            raw_line: line.to_string(),
        });
    }

    sessions
}

/// Scans the process table for running sshuttle tunnels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessScanner;

impl ProcessScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        ProcessScanner
    }

    /// Run `ps aux` and return all active sshuttle sessions.
    ///
    /// Zero matches is a normal result, not an error.
    #[instrument(skip(self))]
    pub fn scan(&self) -> Result<Vec<ActiveSession>, ScanError> {
        let output = Command::new("ps")
            .arg("aux")
            .output()
            .map_err(|e| ScanError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(ScanError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sessions = parse_process_table(&stdout);
        debug!(count = sessions.len(), "scan.complete");
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_HEADER: &str =
        "USER         PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND";

    #[test]
    fn test_parse_typical_session() {
        let output = format!(
            "{}\nroot        4242  0.1  0.2  12345  6789 ?        Ss   10:01   0:00 /usr/bin/python3 /usr/bin/sshuttle -r deploy@bastion.example.net 10.0.0.0/8 --daemon\n",
            PS_HEADER
        );
        let sessions = parse_process_table(&output);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].pid, ProcessId(4242));
        assert_eq!(sessions[0].destination, "deploy@bastion.example.net");
        assert!(sessions[0].raw_line.contains("sshuttle"));
    }

    #[test]
    fn test_parse_no_matches_is_empty() {
        let output = format!(
            "{}\nroot           1  0.0  0.1 168988 11852 ?        Ss   09:58   0:02 /sbin/init\nuser        2001  0.0  0.0   8276  5204 pts/0    Ss   09:59   0:00 -bash\n",
            PS_HEADER
        );
        assert!(parse_process_table(&output).is_empty());
    }

    #[test]
    fn test_parse_requires_remote_flag() {
        // sshuttle in the line but no -r: not a tunnel we can describe
        let output = "user  3000  0.0  0.0  1000  100 ?  S  10:00  0:00 grep sshuttle\n";
        assert!(parse_process_table(output).is_empty());
    }

    #[test]
    fn test_parse_skips_non_numeric_pid() {
        let output = "user  notapid  0.0  0.0  1000  100 ?  S  10:00  0:00 sshuttle -r a@b 10.0.0.0/8\nuser  5150  0.0  0.0  1000  100 ?  S  10:00  0:00 sshuttle -r a@b 10.0.0.0/8\n";
        let sessions = parse_process_table(output);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].pid, ProcessId(5150));
    }

    #[test]
    fn test_parse_short_line_skipped() {
        let output = "sshuttle-r\n";
        assert!(parse_process_table(output).is_empty());
    }

    #[test]
    fn test_parse_unknown_destination_fallback() {
        // -r present but trailing, so the capture group cannot match
        let output = "user  6001  0.0  0.0  1000  100 ?  S  10:00  0:00 sshuttle --daemon -r\n";
        let sessions = parse_process_table(output);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].destination, UNKNOWN_DESTINATION);
    }

    #[test]
    fn test_parse_multiple_sessions_keep_order() {
        let output = "user  100  0.0 0.0 1 1 ? S 10:00 0:00 sshuttle -r one@a 10.0.0.0/8\nuser  200  0.0 0.0 1 1 ? S 10:00 0:00 sshuttle -r two@b 10.0.0.0/8\n";
        let sessions = parse_process_table(output);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].destination, "one@a");
        assert_eq!(sessions[1].destination, "two@b");
    }

    #[test]
    fn test_parse_greedy_takes_last_remote() {
        let output = "user  300  0.0 0.0 1 1 ? S 10:00 0:00 sshuttle -r first@a -r second@b 10.0.0.0/8\n";
        let sessions = parse_process_table(output);
        assert_eq!(sessions[0].destination, "second@b");
    }

    #[test]
    fn test_scanner_runs_ps() {
        // ps itself must be spawnable; sshuttle is almost certainly absent
        let scanner = ProcessScanner::new();
        let result = scanner.scan();
        assert!(result.is_ok());
    }

    #[test]
    fn test_scan_error_converts_to_common() {
        let err: ts_common::Error = ScanError::Spawn("no ps".to_string()).into();
        assert_eq!(err.code(), 20);
        assert!(err.to_string().contains("no ps"));
    }
}
