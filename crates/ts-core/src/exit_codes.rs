//! Exit codes for the ts-core CLI.
//!
//! Exit codes communicate outcome without requiring output parsing:
//! - 0: success (including "nothing selected" interactive exits)
//! - 1: any failure (validation, scan, launch, terminal)

/// Exit codes for ts-core operations.
///
/// These codes are a stable contract for wrapper scripts. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run: command completed, or the user quit without selecting.
    Success = 0,

    /// Any error: bad arguments, rejected tunnel definition, scan or
    /// launch failure, terminal initialization failure.
    Failure = 1,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::Failure => "ERR",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
