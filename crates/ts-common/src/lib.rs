//! tunnel-select common types and errors.
//!
//! This crate provides foundational types shared across ts-core modules:
//! - Process identity wrapper
//! - Common error types with stable codes
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use id::ProcessId;
pub use output::OutputFormat;
