//! Bit-banged 1-Wire master.
//!
//! Runs on one open-drain GPIO with an external 4.7 kOhm pull-up. Standard
//! speed timings; every slot is timed with `DelayNs`. The read slot samples
//! the bus a few microseconds after releasing it, so it is wrapped in a
//! critical section to keep an interrupt from stretching it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::OneWireError;

pub const SKIP_ROM: u8 = 0xCC;

type Result<T> = core::result::Result<T, OneWireError>;

/// Byte-level bus operations a device driver needs.
pub trait OneWireBus {
    /// Reset pulse. `Ok` means at least one device answered with presence.
    fn reset(&mut self, delay: &mut impl DelayNs) -> Result<()>;
    fn write_byte(&mut self, byte: u8, delay: &mut impl DelayNs) -> Result<()>;
    fn read_byte(&mut self, delay: &mut impl DelayNs) -> Result<u8>;

    fn write_bytes(&mut self, bytes: &[u8], delay: &mut impl DelayNs) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte, delay)?;
        }
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8], delay: &mut impl DelayNs) -> Result<()> {
        for byte in buf {
            *byte = self.read_byte(delay)?;
        }
        Ok(())
    }

    /// Reset, address every device (single-drop bus), then send `command`.
    fn send_command(&mut self, command: u8, delay: &mut impl DelayNs) -> Result<()> {
        self.reset(delay)?;
        self.write_byte(SKIP_ROM, delay)?;
        self.write_byte(command, delay)
    }
}

pub struct OneWire<P> {
    pin: P,
}

impl<P> OneWire<P>
where
    P: InputPin + OutputPin,
{
    /// `pin` must be open-drain; it is released (driven high) here.
    pub fn new(mut pin: P) -> Result<Self> {
        pin.set_high().map_err(|_| OneWireError::Pin)?;
        Ok(Self { pin })
    }

    pub fn write_bit(&mut self, bit: bool, delay: &mut impl DelayNs) -> Result<()> {
        let (low_us, high_us) = if bit { (6, 64) } else { (60, 10) };
        self.pin.set_low().map_err(|_| OneWireError::Pin)?;
        delay.delay_us(low_us);
        self.pin.set_high().map_err(|_| OneWireError::Pin)?;
        delay.delay_us(high_us);
        Ok(())
    }

    pub fn read_bit(&mut self, delay: &mut impl DelayNs) -> Result<bool> {
        let pin = &mut self.pin;
        let bit = critical_section::with(|_| {
            pin.set_low().map_err(|_| OneWireError::Pin)?;
            delay.delay_us(6);
            pin.set_high().map_err(|_| OneWireError::Pin)?;
            delay.delay_us(9);
            pin.is_high().map_err(|_| OneWireError::Pin)
        })?;
        // Rest of the 70 µs slot
        delay.delay_us(55);
        Ok(bit)
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> OneWireBus for OneWire<P>
where
    P: InputPin + OutputPin,
{
    fn reset(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        // Wait for the pull-up to bring the bus high
        let mut retries = 125;
        while self.pin.is_low().map_err(|_| OneWireError::Pin)? {
            if retries == 0 {
                return Err(OneWireError::BusNotHigh);
            }
            retries -= 1;
            delay.delay_us(2);
        }

        self.pin.set_low().map_err(|_| OneWireError::Pin)?;
        delay.delay_us(480);
        self.pin.set_high().map_err(|_| OneWireError::Pin)?;
        delay.delay_us(70);

        let presence = self.pin.is_low().map_err(|_| OneWireError::Pin)?;
        delay.delay_us(410);

        if presence {
            Ok(())
        } else {
            Err(OneWireError::NoPresence)
        }
    }

    fn write_byte(&mut self, byte: u8, delay: &mut impl DelayNs) -> Result<()> {
        for i in 0..8 {
            self.write_bit((byte >> i) & 1 == 1, delay)?;
        }
        Ok(())
    }

    fn read_byte(&mut self, delay: &mut impl DelayNs) -> Result<u8> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit(delay)? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }
}

/// Dallas/Maxim CRC-8 (poly x^8 + x^5 + x^4 + 1, LSB first).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// `data` ends with its own CRC byte; a valid block checks to zero.
pub fn check_crc8(data: &[u8]) -> Result<()> {
    if crc8(data) == 0 {
        Ok(())
    } else {
        Err(OneWireError::CrcMismatch)
    }
}
