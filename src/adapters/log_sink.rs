//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production). Each
//! line starts with a tag so the serial stream can be grepped.

use core::fmt::Write;

use heapless::String;
use log::{error, info, warn};

use crate::app::events::{AppEvent, StatusReport};
use crate::app::ports::EventSink;
use crate::control::fan::FanState;
use crate::control::feeding::{FeedSource, ValvePosition};
use crate::sensors::temperature::TemperatureReading;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | controller running");
            }
            AppEvent::ClockFault(e) => {
                error!("CLOCK | init failed: {}; halting", e);
            }
            AppEvent::ClockUnavailable(e) => {
                warn!("CLOCK | read failed: {}", e);
            }
            AppEvent::FeedRequested(ev) => match ev.source {
                FeedSource::Manual => info!("FEED | Manual feeding requested"),
                FeedSource::Auto => info!("FEED | Auto feeding (interval elapsed)"),
            },
            AppEvent::ValveMoved(ValvePosition::Open) => {
                info!("FEED | Valve opened");
            }
            AppEvent::ValveMoved(ValvePosition::Closed) => {
                info!("FEED | Valve closed");
            }
            AppEvent::FeedCompleted(ev) => {
                info!("FEED | {:?} feed complete (requested at {} ms)", ev.source, ev.at_ms);
            }
            AppEvent::FanChanged(FanState::On) => {
                info!("FAN | ON (temperature high)");
            }
            AppEvent::FanChanged(FanState::Off) => {
                info!("FAN | OFF (temperature normal)");
            }
            AppEvent::TemperatureFault => {
                warn!("TEMP | read error (probe disconnected)");
            }
            AppEvent::Status(report) => {
                info!("{}", format_status(report));
            }
        }
    }
}

/// `STATUS | pH: 7.12 | Temp: 26.44C | Fan: OFF | pH Alert: OFF`
pub fn format_status(r: &StatusReport) -> String<96> {
    let mut line: String<96> = String::new();
    let temp_ok = match r.temperature {
        TemperatureReading::Celsius(c) => {
            write!(line, "STATUS | pH: {:.2} | Temp: {:.2}C", r.ph, c)
        }
        TemperatureReading::Disconnected => {
            write!(line, "STATUS | pH: {:.2} | Temp: ERROR", r.ph)
        }
    };
    let rest = write!(
        line,
        " | Fan: {} | pH Alert: {}",
        on_off(r.fan.is_on()),
        on_off(r.ph_alert)
    );
    if temp_ok.is_err() || rest.is_err() {
        warn!("status line truncated");
    }
    line
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
