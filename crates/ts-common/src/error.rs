//! Error types for tunnel-select.
//!
//! Structured error handling with stable numeric codes for machine parsing
//! and category classification for log fields. Codes are grouped by tens
//! per category and must not be renumbered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tunnel-select operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classes, logged as a field on failure events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Tunnel definition file errors (load, parse, save).
    Config,
    /// Process table scanning errors.
    Scan,
    /// Active session termination errors.
    Session,
    /// Tunnel command execution errors.
    Launch,
    /// Add-flow input validation and probe errors.
    Validation,
    /// Filesystem and serialization failures.
    Io,
    /// Terminal UI errors.
    Tui,
}

impl ErrorCategory {
    /// Lowercase token used in log fields and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Scan => "scan",
            ErrorCategory::Session => "session",
            ErrorCategory::Launch => "launch",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Io => "io",
            ErrorCategory::Tui => "tui",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for tunnel-select.
#[derive(Error, Debug)]
pub enum Error {
    // catalog file (10s)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    ConfigParse(String),

    // process scanning (20s)
    #[error("process scan failed: {0}")]
    Scan(String),

    // session signaling (30s)
    #[error("process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("permission denied signaling process {pid}")]
    PermissionDenied { pid: u32 },

    #[error("signal delivery failed: {0}")]
    Signal(String),

    // launch (40s)
    #[error("tunnel launch failed: {0}")]
    Launch(String),

    // add-flow (50s)
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Probe(String),

    #[error("operation cancelled")]
    Cancelled,

    // filesystem and serialization (60s)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // terminal (70s)
    #[error("terminal error: {0}")]
    Tui(String),

    #[error("{0}")]
    FeatureDisabled(String),
}

impl Error {
    /// Stable numeric code, banded by tens: 10s catalog, 20s scanning,
    /// 30s sessions, 40s launch, 50s add-flow, 60s I/O, 70s terminal.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::ConfigParse(_) => 11,
            Error::Scan(_) => 20,
            Error::ProcessNotFound { .. } => 30,
            Error::PermissionDenied { .. } => 31,
            Error::Signal(_) => 32,
            Error::Launch(_) => 40,
            Error::Validation(_) => 50,
            Error::Probe(_) => 51,
            Error::Cancelled => 52,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Tui(_) => 70,
            Error::FeatureDisabled(_) => 71,
        }
    }

    /// The coarse class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::ConfigParse(_) => ErrorCategory::Config,
            Error::Scan(_) => ErrorCategory::Scan,
            Error::ProcessNotFound { .. } | Error::PermissionDenied { .. } | Error::Signal(_) => {
                ErrorCategory::Session
            }
            Error::Launch(_) => ErrorCategory::Launch,
            Error::Validation(_) | Error::Probe(_) | Error::Cancelled => ErrorCategory::Validation,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
            Error::Tui(_) | Error::FeatureDisabled(_) => ErrorCategory::Tui,
        }
    }

    /// True when retrying after the user fixes input or environment can
    /// succeed. A vanished process, a deliberate cancel, and a
    /// compiled-out feature cannot be retried into working.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::ProcessNotFound { .. } | Error::Cancelled | Error::FeatureDisabled(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> Vec<Error> {
        vec![
            Error::Config("unreadable".into()),
            Error::ConfigParse("bad yaml".into()),
            Error::Scan("ps exited 1".into()),
            Error::ProcessNotFound { pid: 4242 },
            Error::PermissionDenied { pid: 4242 },
            Error::Signal("kill failed".into()),
            Error::Launch("sshuttle not on PATH".into()),
            Error::Validation("subnet required".into()),
            Error::Probe("ssh timed out".into()),
            Error::Cancelled,
            Error::Io(std::io::Error::other("disk")),
            Error::Json(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
            Error::Tui("terminal too small".into()),
            Error::FeatureDisabled("no ui".into()),
        ]
    }

    #[test]
    fn test_every_code_sits_inside_its_category_band() {
        for err in sample_errors() {
            let band = match err.category() {
                ErrorCategory::Config => 10,
                ErrorCategory::Scan => 20,
                ErrorCategory::Session => 30,
                ErrorCategory::Launch => 40,
                ErrorCategory::Validation => 50,
                ErrorCategory::Io => 60,
                ErrorCategory::Tui => 70,
            };
            let code = err.code();
            assert!(
                (band..band + 10).contains(&code),
                "code {} of {:?} escapes band {}",
                code,
                err.category(),
                band
            );
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u32> = sample_errors().iter().map(Error::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), sample_errors().len());
    }

    #[test]
    fn test_pinned_codes() {
        // Wrapper scripts match on these; renumbering breaks them.
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::ProcessNotFound { pid: 1 }.code(), 30);
        assert_eq!(Error::Launch("x".into()).code(), 40);
        assert_eq!(Error::Cancelled.code(), 52);
    }

    #[test]
    fn test_recoverability() {
        for err in sample_errors() {
            let expected = !matches!(
                err,
                Error::ProcessNotFound { .. } | Error::Cancelled | Error::FeatureDisabled(_)
            );
            assert_eq!(err.is_recoverable(), expected);
        }
        assert!(Error::PermissionDenied { pid: 1 }.is_recoverable());
        assert!(!Error::Cancelled.is_recoverable());
    }

    #[test]
    fn test_category_tokens() {
        assert_eq!(ErrorCategory::Config.as_str(), "config");
        assert_eq!(ErrorCategory::Session.to_string(), "session");
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
    }

    #[test]
    fn test_validation_displays_bare_message() {
        // Add-flow messages reach the terminal verbatim, no prefix.
        let err = Error::Validation("tunnel name is required (use --name)".into());
        assert_eq!(err.to_string(), "tunnel name is required (use --name)");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(Error::Cancelled.to_string(), "operation cancelled");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.code(), 60);
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
