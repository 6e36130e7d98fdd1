//! Signal delivery for stopping tunnel sessions.
//!
//! Sessions get a single SIGTERM. sshuttle tears down its firewall rules
//! on TERM, so no SIGKILL escalation is wanted here.

use thiserror::Error;
use tracing::debug;

use ts_common::ProcessId;

/// Errors from delivering a signal to a session process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// No such process.
    #[error("process not found")]
    NotFound,

    /// The process exists but belongs to another user.
    #[error("permission denied")]
    PermissionDenied,

    /// kill(2) rejected the signal number.
    #[error("invalid signal")]
    InvalidSignal,

    /// Anything else the OS reported.
    #[error("{0}")]
    Other(String),
}

impl SignalError {
    /// Lift into the shared error type, attaching the target pid.
    pub fn into_common(self, pid: ProcessId) -> ts_common::Error {
        match self {
            SignalError::NotFound => ts_common::Error::ProcessNotFound { pid: pid.0 },
            SignalError::PermissionDenied => ts_common::Error::PermissionDenied { pid: pid.0 },
            other => ts_common::Error::Signal(other.to_string()),
        }
    }
}

/// Stops running tunnel sessions.
///
/// The selection controller calls through this seam, so tests can record
/// termination order without sending real signals.
pub trait SessionTerminator {
    /// Request termination of one session process.
    fn terminate(&mut self, pid: ProcessId) -> Result<(), SignalError>;
}

/// Terminator that delivers SIGTERM via kill(2).
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalTerminator;

impl SignalTerminator {
    /// Create a new terminator.
    pub fn new() -> Self {
        SignalTerminator
    }
}

#[cfg(unix)]
impl SessionTerminator for SignalTerminator {
    fn terminate(&mut self, pid: ProcessId) -> Result<(), SignalError> {
        send_signal(pid.0, libc::SIGTERM)
    }
}

#[cfg(not(unix))]
impl SessionTerminator for SignalTerminator {
    fn terminate(&mut self, _pid: ProcessId) -> Result<(), SignalError> {
        Err(SignalError::Other(
            "signals not supported on this platform".to_string(),
        ))
    }
}

/// Send a signal to a process.
#[cfg(unix)]
fn send_signal(pid: u32, signal: i32) -> Result<(), SignalError> {
    let result = unsafe { libc::kill(pid as i32, signal) };
    if result == 0 {
        debug!(pid, signal, "session.signal_sent");
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(SignalError::NotFound),
        Some(libc::EPERM) => Err(SignalError::PermissionDenied),
        Some(libc::EINVAL) => Err(SignalError::InvalidSignal),
        _ => Err(SignalError::Other(err.to_string())),
    }
}

/// Check if a process exists.
#[cfg(unix)]
pub fn process_exists(pid: ProcessId) -> bool {
    let result = unsafe { libc::kill(pid.0 as i32, 0) };
    if result == 0 {
        return true;
    }
    let err = std::io::Error::last_os_error();
    // EPERM means the process exists but we can't signal it
    err.raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
pub fn process_exists(_pid: ProcessId) -> bool {
    false
}
