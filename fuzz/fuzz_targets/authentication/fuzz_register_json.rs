// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_register_json
// Purpose: fuzz the full RegisterData -> NewUser validation pipeline.
#![no_main]

use libfuzzer_sys::fuzz_target;
use revline::domain::{NewUser, RegisterData};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<RegisterData>(data) {
        let _: Result<NewUser, String> = payload.try_into();
    }
});
