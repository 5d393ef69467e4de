//! Fuzz target for `package.json` manifest parsing.
//!
//! Goal: The parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_manifest_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (package.json must be UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        // Manifest parsing - should never panic
        let _ = exportguard_repo::fuzz::parse_manifest(text);
    }
});
