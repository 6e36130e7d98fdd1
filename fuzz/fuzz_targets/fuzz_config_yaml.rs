//! Fuzz target for tunnel catalog YAML parsing.
//!
//! Tests that catalog deserialization handles arbitrary input without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_core::config::Config;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return an error
    let _ = serde_yaml::from_slice::<Config>(data);
});
