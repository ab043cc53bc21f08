//! Fuzz target for exceptions JSON loading.

#![no_main]

use libfuzzer_sys::fuzz_target;
use floracheck::ExceptionStore;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        let _ = ExceptionStore::from_json_str(json);
    }
});
