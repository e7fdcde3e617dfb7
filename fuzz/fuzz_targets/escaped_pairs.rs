#![no_main]

use libfuzzer_sys::fuzz_target;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if matches!(c, '=' | ';' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// Build a well-formed argument string from fuzzer-chosen pairs and check it decodes back.
fuzz_target!(|pairs: Vec<(String, String)>| {
    let pairs: Vec<(String, String)> = pairs.into_iter().filter(|(k, _)| !k.is_empty()).collect();
    let encoded = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join(";");

    let args = serde_ptargs::parse(&encoded).expect("escaped pairs must decode");
    for (k, v) in &pairs {
        let values = args.get_all(k).expect("key must be present");
        assert!(values.contains(v));
    }
});
