//! Fuzz target for snapshot TSV parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use floracheck::source::parse_snapshot;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are not
    if let Ok(index) = parse_snapshot("fuzz", data) {
        assert_eq!(index.metadata.record_count, index.len());
    }
});
