#![no_main]

//! Fuzz target for JSON document parsing
//!
//! Exercises the validating deserializers (pHash grids, image grids and
//! decimal field elements) with arbitrary input.
//!
//! Run with: cargo +nightly fuzz run fuzz_bundle_json

use libfuzzer_sys::fuzz_target;
use zkphash_core::{image_from_json, CommitBundle, PhashDatabase};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must never panic, whatever the shape of the input
    let _ = PhashDatabase::from_json(text);
    let _ = image_from_json(text);

    if let Ok(bundle) = CommitBundle::from_json(text) {
        // Anything accepted must survive a re-encode unchanged
        let json = bundle.to_json_pretty().expect("re-encode");
        let again = CommitBundle::from_json(&json).expect("re-parse");
        assert_eq!(again, bundle);
    }
});
