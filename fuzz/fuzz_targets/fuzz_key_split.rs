//! Fuzz target for extra-args key extraction.
//!
//! Tests that `split_key_path` handles arbitrary input without panicking
//! and only ever extracts a single whitespace-free token.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_core::command::split_key_path;

fuzz_target!(|data: &str| {
    let (key, _remainder) = split_key_path(data);
    if let Some(key) = key {
        assert!(!key.is_empty());
        assert!(!key.chars().any(char::is_whitespace));
    }
});
