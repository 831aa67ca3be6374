#![no_main]
use libfuzzer_sys::fuzz_target;

use glove_core::{CommandParser, TelemetryDecoder};

fuzz_target!(|data: &[u8]| {
    // Arbitrary byte streams must never panic either side of the wire.
    let mut parser = CommandParser::new();
    let mut decoder = TelemetryDecoder::new();
    for &byte in data {
        let _ = parser.push(byte);
        let _ = decoder.push(byte);
    }
});
