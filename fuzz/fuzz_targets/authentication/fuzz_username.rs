// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_username
#![no_main]

use libfuzzer_sys::fuzz_target;
use revline::domain::UserName;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = UserName::parse(s.to_string());
    }
});
