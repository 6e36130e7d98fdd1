//! Fuzz target for process table parsing.
//!
//! Tests that `parse_process_table` handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_core::scan::parse_process_table;

fuzz_target!(|data: &str| {
    // Malformed lines are skipped, never fatal
    let _ = parse_process_table(data);
});
