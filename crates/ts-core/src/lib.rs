//! Tunnel Select Core Library
//!
//! This library provides the core functionality for the sshuttle tunnel
//! selector:
//! - Process table scanning for running sshuttle sessions
//! - Tunnel command construction from definitions
//! - Session catalog and selection handling
//! - Tunnel registration (add flow) with SSH reachability probing
//! - Exit codes for CLI operations
//!
//! The binary entry point is in `main.rs`.

pub mod action;
pub mod catalog;
pub mod command;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod probe;
pub mod register;
pub mod scan;
pub mod select;

// TUI module (optional, behind "ui" feature)
#[cfg(feature = "ui")]
pub mod tui;
