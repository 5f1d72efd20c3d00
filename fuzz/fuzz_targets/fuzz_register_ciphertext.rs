#![no_main]

use libfuzzer_sys::fuzz_target;
use veildraw_core::coprocessor::{Coprocessor, LocalCoprocessor};

fuzz_target!(|data: &[u8]| {
    let coprocessor = LocalCoprocessor::new([0u8; 32]);
    // Arbitrary bytes must never panic the submission path; anything that
    // is not a well-formed sealed value comes back as an error.
    if let Ok(handle) = coprocessor.register(data) {
        assert!(!handle.is_zero());
    }
});
