#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Transport {
    cert: Option<String>,
    #[serde(rename = "iat-mode")]
    iat_mode: Option<u8>,
    #[serde(default)]
    server: Vec<String>,
}

// Arbitrary bytes must never panic, and every successfully decoded key must have at
// least one value.
fuzz_target!(|data: &[u8]| {
    if let Ok(args) = serde_ptargs::parse_slice(data) {
        for (key, values) in args.iter() {
            assert!(!key.is_empty());
            assert!(!values.is_empty());
        }
    }
    let _ = serde_ptargs::from_slice::<Transport>(data);
    let _ = serde_ptargs::from_slice::<HashMap<String, Vec<String>>>(data);
    if let Err(err) = serde_ptargs::parse_slice_with_options(data, &serde_ptargs::Options::default()) {
        let _ = err.to_string();
    }
});
