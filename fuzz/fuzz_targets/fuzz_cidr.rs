//! Fuzz target for subnet list validation.
//!
//! Tests that CIDR validation handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_core::register::validate_subnets;

fuzz_target!(|data: &str| {
    // Malformed lists are a validation error, never a panic
    let _ = validate_subnets(data);
});
