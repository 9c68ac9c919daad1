//! Fuzz target: DS3231 time register decoding
//!
//! Feeds arbitrary seconds/minutes/hours register bytes and verifies:
//! - No panics on out-of-range BCD nibbles or 12-hour encodings
//! - Every accepted value is a valid 24-hour time of day
//!
//! cargo fuzz run fuzz_rtc_decode

#![no_main]

use aquactl::drivers::ds3231::decode_time;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 3]| {
    if let Ok(t) = decode_time(data) {
        assert!(t.hour <= 23, "hour {} from {:02X?}", t.hour, data);
        assert!(t.minute <= 59, "minute {} from {:02X?}", t.minute, data);
        assert!(t.second <= 59, "second {} from {:02X?}", t.second, data);
    }
});
