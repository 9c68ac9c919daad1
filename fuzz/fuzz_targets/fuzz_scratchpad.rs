//! Fuzz target: DS18B20 scratchpad reads
//!
//! Serves arbitrary bytes as the probe's answer and verifies:
//! - No panics on short or corrupted transfers (missing bytes read as 0xFF)
//! - A reading is only accepted when the CRC byte matches
//! - Accepted readings stay inside the 16-bit register range
//!
//! cargo fuzz run fuzz_scratchpad

#![no_main]

use aquactl::drivers::ds18b20::Ds18b20;
use aquactl::drivers::onewire::{crc8, OneWireBus};
use aquactl::error::OneWireError;
use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;

/// Bus that answers reads from the fuzz input, then goes silent.
struct ReplayBus<'a> {
    bytes: core::slice::Iter<'a, u8>,
}

impl OneWireBus for ReplayBus<'_> {
    fn reset(&mut self, _delay: &mut impl DelayNs) -> Result<(), OneWireError> {
        Ok(())
    }

    fn write_byte(&mut self, _byte: u8, _delay: &mut impl DelayNs) -> Result<(), OneWireError> {
        Ok(())
    }

    fn read_byte(&mut self, _delay: &mut impl DelayNs) -> Result<u8, OneWireError> {
        // An idle bus reads as all ones.
        Ok(self.bytes.next().copied().unwrap_or(0xFF))
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let mut bus = ReplayBus { bytes: data.iter() };
    let probe = Ds18b20::new();

    match probe.read_celsius(&mut bus, &mut NoDelay) {
        Ok(c) => {
            let mut pad = [0xFFu8; 9];
            for (slot, b) in pad.iter_mut().zip(data) {
                *slot = *b;
            }
            assert_eq!(crc8(&pad[..8]), pad[8], "accepted a bad CRC");
            assert!((-2048.0..2048.0).contains(&c), "reading {} out of range", c);
        }
        Err(e) => assert_eq!(e, OneWireError::CrcMismatch),
    }
});
