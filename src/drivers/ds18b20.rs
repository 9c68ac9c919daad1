//! DS18B20 temperature probe, the only device on its 1-Wire bus.

use embedded_hal::delay::DelayNs;

use crate::drivers::onewire::{check_crc8, OneWireBus};
use crate::error::OneWireError;
use crate::sensors::temperature::scratchpad_to_celsius;

pub const CONVERT_T: u8 = 0x44;
pub const READ_SCRATCHPAD: u8 = 0xBE;
pub const WRITE_SCRATCHPAD: u8 = 0x4E;

/// Config register value for 12-bit (0.0625 °C) resolution.
pub const CONFIG_12_BIT: u8 = 0x7F;
/// Worst-case 12-bit conversion time.
pub const CONVERSION_MS: u32 = 750;

pub type Scratchpad = [u8; 9];

#[derive(Debug, Default)]
pub struct Ds18b20;

impl Ds18b20 {
    pub fn new() -> Self {
        Self
    }

    /// Switch to 12-bit resolution, keeping the alarm registers.
    pub fn configure(&self, bus: &mut impl OneWireBus, delay: &mut impl DelayNs) -> Result<(), OneWireError> {
        let pad = self.read_scratchpad(bus, delay)?;
        bus.send_command(WRITE_SCRATCHPAD, delay)?;
        bus.write_bytes(&[pad[2], pad[3], CONFIG_12_BIT], delay)?;
        bus.reset(delay)
    }

    /// Start a conversion and block until it is done.
    pub fn convert(&self, bus: &mut impl OneWireBus, delay: &mut impl DelayNs) -> Result<(), OneWireError> {
        bus.send_command(CONVERT_T, delay)?;
        delay.delay_ms(CONVERSION_MS);
        Ok(())
    }

    /// Result of the last conversion in °C.
    pub fn read_celsius(&self, bus: &mut impl OneWireBus, delay: &mut impl DelayNs) -> Result<f32, OneWireError> {
        let pad = self.read_scratchpad(bus, delay)?;
        Ok(scratchpad_to_celsius(pad[0], pad[1]))
    }

    pub fn read_scratchpad(
        &self,
        bus: &mut impl OneWireBus,
        delay: &mut impl DelayNs,
    ) -> Result<Scratchpad, OneWireError> {
        bus.send_command(READ_SCRATCHPAD, delay)?;
        let mut pad = [0u8; 9];
        bus.read_bytes(&mut pad, delay)?;
        check_crc8(&pad)?;
        Ok(pad)
    }
}
