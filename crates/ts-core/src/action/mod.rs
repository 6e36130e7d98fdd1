//! Session actions: stopping running tunnels and launching new ones.

pub mod launch;
pub mod signal;

pub use launch::run_command;
pub use signal::{process_exists, SessionTerminator, SignalError, SignalTerminator};
