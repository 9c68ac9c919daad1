//! Outbound application events.
//!
//! The [`AquariumService`](super::service::AquariumService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them; the firmware writes them to the
//! serial log.

use crate::control::fan::FanState;
use crate::control::feeding::{FeedEvent, ValvePosition};
use crate::error::ClockError;
use crate::sensors::temperature::TemperatureReading;

use super::presenter::StatusMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Startup finished; the loop is about to run.
    Started,

    /// The RTC could not be brought up. The controller halts after this.
    ClockFault(ClockError),

    /// The RTC failed a read mid-run (non-fatal).
    ClockUnavailable(ClockError),

    /// The arbiter picked a feed source.
    FeedRequested(FeedEvent),

    /// The valve was commanded to a new position.
    ValveMoved(ValvePosition),

    /// A feed sequence ran to completion.
    FeedCompleted(FeedEvent),

    /// The fan crossed a threshold.
    FanChanged(FanState),

    /// The temperature probe did not produce a reading.
    TemperatureFault,

    /// End-of-iteration status line.
    Status(StatusReport),
}

/// One consolidated status line per loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub ph: f32,
    pub temperature: TemperatureReading,
    pub fan: FanState,
    /// No rule sets this yet; it is reported so the output stays stable
    /// if a pH threshold is added later.
    pub ph_alert: bool,
    pub mode: StatusMode,
}
