//! Fuzz target for the annotation marker parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_annotation_parser
//!
//! This exercises `discovery::parse_marker` with arbitrary byte sequences
//! to find panics or hangs in the marker regex and target-list splitting.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // We don't care about the result — just that it doesn't panic
        let _ = graft_core::discovery::parse_marker(s);
        let _ = graft_core::discovery::injected_name(s);
    }
});
