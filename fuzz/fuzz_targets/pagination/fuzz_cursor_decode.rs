// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_cursor_decode
// Purpose: a pagination cursor comes straight from the client; decoding must
// never panic and malformed input must come back as None.
#![no_main]

use chrono::{DateTime, Utc};
use libfuzzer_sys::fuzz_target;
use revline::domain::Cursor;
use uuid::Uuid;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = Cursor::<DateTime<Utc>, i64>::decode(raw);
        let _ = Cursor::<i32, i64>::decode(raw);
        let _ = Cursor::<String, Uuid>::decode(raw);
    }
});
