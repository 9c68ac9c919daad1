//! Unified error types for the aquarium controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! startup path's error handling uniform. All variants are `Copy` so they
//! travel through the event sink without allocation.

use core::fmt;

use embedded_hal::i2c::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The real-time clock could not be used.
    Clock(ClockError),
    /// The One-Wire temperature bus misbehaved.
    OneWire(OneWireError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(e) => write!(f, "clock: {e}"),
            Self::OneWire(e) => write!(f, "one-wire: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Clock errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The RTC did not acknowledge its address.
    NotResponding,
    /// An I2C transfer failed after the device was found.
    Bus(ErrorKind),
    /// Register contents do not form a valid time of day.
    InvalidTime,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResponding => write!(f, "RTC not responding"),
            Self::Bus(kind) => write!(f, "I2C error ({kind:?})"),
            Self::InvalidTime => write!(f, "invalid time registers"),
        }
    }
}

impl From<ClockError> for Error {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

// ---------------------------------------------------------------------------
// One-Wire errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError {
    /// The bus never returned high after release (shorted or no pull-up).
    BusNotHigh,
    /// No device answered the reset pulse.
    NoPresence,
    /// Scratchpad CRC did not match.
    CrcMismatch,
    /// The GPIO itself reported an error.
    Pin,
}

impl fmt::Display for OneWireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusNotHigh => write!(f, "bus held low"),
            Self::NoPresence => write!(f, "no presence pulse"),
            Self::CrcMismatch => write!(f, "CRC mismatch"),
            Self::Pin => write!(f, "pin error"),
        }
    }
}

impl core::error::Error for ClockError {}
impl core::error::Error for OneWireError {}

impl From<OneWireError> for Error {
    fn from(e: OneWireError) -> Self {
        Self::OneWire(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
