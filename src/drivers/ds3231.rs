//! DS3231 real-time clock on the shared I2C bus.
//!
//! The bus is owned by the hardware adapter and lent to each call, so the
//! clock and the LCD backpack can share it without a bus manager.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use log::warn;

use crate::app::ports::WallTime;
use crate::error::ClockError;

pub const ADDRESS: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_STATUS: u8 = 0x0F;

const HOUR_12H: u8 = 1 << 6;
const HOUR_PM: u8 = 1 << 5;
const STATUS_OSF: u8 = 1 << 7;

#[derive(Debug, Default)]
pub struct Ds3231;

impl Ds3231 {
    pub fn new() -> Self {
        Self
    }

    /// Check the chip answers. A stopped oscillator is only a warning: the
    /// time is wrong but the clock still runs once powered.
    pub fn probe<I: I2c>(&self, i2c: &mut I) -> Result<(), ClockError> {
        let mut status = [0u8];
        i2c.write_read(ADDRESS, &[REG_STATUS], &mut status)
            .map_err(|e| map_bus(e.kind()))?;
        if status[0] & STATUS_OSF != 0 {
            warn!("RTC oscillator was stopped; time may be invalid");
        }
        Ok(())
    }

    pub fn now<I: I2c>(&self, i2c: &mut I) -> Result<WallTime, ClockError> {
        let mut regs = [0u8; 3];
        i2c.write_read(ADDRESS, &[REG_SECONDS], &mut regs)
            .map_err(|e| map_bus(e.kind()))?;
        decode_time(regs)
    }

    /// Write a 24-hour time of day. Also clears the oscillator-stop flag.
    pub fn set_time<I: I2c>(&self, i2c: &mut I, t: WallTime) -> Result<(), ClockError> {
        if t.hour > 23 || t.minute > 59 || t.second > 59 {
            return Err(ClockError::InvalidTime);
        }
        i2c.write(ADDRESS, &[REG_SECONDS, to_bcd(t.second), to_bcd(t.minute), to_bcd(t.hour)])
            .map_err(|e| map_bus(e.kind()))?;
        i2c.write(ADDRESS, &[REG_STATUS, 0x00])
            .map_err(|e| map_bus(e.kind()))
    }
}

fn map_bus(kind: ErrorKind) -> ClockError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => ClockError::NotResponding,
        other => ClockError::Bus(other),
    }
}

/// Seconds, minutes, hours registers to a 24-hour [`WallTime`].
pub fn decode_time(regs: [u8; 3]) -> Result<WallTime, ClockError> {
    let second = from_bcd(regs[0] & 0x7F);
    let minute = from_bcd(regs[1] & 0x7F);
    let h = regs[2];
    let hour = if h & HOUR_12H != 0 {
        let h12 = from_bcd(h & 0x1F);
        if !(1..=12).contains(&h12) {
            return Err(ClockError::InvalidTime);
        }
        match (h12, h & HOUR_PM != 0) {
            (12, false) => 0,
            (12, true) => 12,
            (h12, false) => h12,
            (h12, true) => h12 + 12,
        }
    } else {
        from_bcd(h & 0x3F)
    };

    if hour > 23 || minute > 59 || second > 59 {
        return Err(ClockError::InvalidTime);
    }
    Ok(WallTime { hour, minute, second })
}

fn from_bcd(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0F)
}

fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}
