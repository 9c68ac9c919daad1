//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AquariumService (domain)
//! ```
//!
//! Driven adapters (probes, valve, relays, clock, display, log stream)
//! implement these traits. The [`AquariumService`](super::service::AquariumService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use embedded_hal::delay::DelayNs;

use crate::control::fan::FanState;
use crate::control::feeding::ValvePosition;
use crate::error::ClockError;
use crate::sensors::temperature::TemperatureReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// One raw sample from the pH amplifier, in `0..=adc_max`.
    fn sample_ph(&mut self) -> u16;

    /// Start a temperature conversion. May block until it completes.
    fn request_temperature(&mut self);

    /// Result of the last conversion.
    fn read_temperature(&mut self) -> TemperatureReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port. No actuator reports back; a command is assumed to
/// take effect.
pub trait ActuatorPort {
    /// Move the feeder valve.
    fn set_valve(&mut self, position: ValvePosition);

    /// Drive the fan relay.
    fn set_fan(&mut self, state: FanState);

    /// Drive the pH alert LED.
    fn set_ph_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Time port (wall clock + monotonic milliseconds)
// ───────────────────────────────────────────────────────────────

/// Hour and minute as kept by the RTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

pub trait TimePort {
    /// Bring up the wall clock. Failure here is fatal to the controller.
    fn init_clock(&mut self) -> Result<(), ClockError>;

    /// Current time of day.
    fn wall_time(&mut self) -> Result<WallTime, ClockError>;

    /// Milliseconds since boot. Wraps at `u32::MAX`; compare with
    /// `wrapping_sub`.
    fn uptime_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Display port (2 x 16 character surface)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Write `text` starting at (`row`, `col`). Characters past the end of
    /// the row are dropped.
    fn write_at(&mut self, row: u8, col: u8, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → log stream)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Board bundle
// ───────────────────────────────────────────────────────────────

/// Everything the main loop drives in one value, so sensor reads,
/// actuator moves, display writes and blocking delays never need two
/// mutable borrows of the same adapter.
pub trait Board: SensorPort + ActuatorPort + TimePort + DisplayPort + DelayNs {}

impl<T> Board for T where T: SensorPort + ActuatorPort + TimePort + DisplayPort + DelayNs {}
