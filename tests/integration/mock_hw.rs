//! Mock board for integration tests.
//!
//! Records every actuator call and blocking delay so tests can assert on
//! the full command history, keeps a 2 x 16 framebuffer for the display,
//! and runs a simulated millisecond clock that only moves when the
//! service blocks. Button presses can be scheduled at future clock values;
//! they fire into the latch while the service is inside a delay, the way
//! the real ISR would.

use std::collections::VecDeque;

use aquactl::app::events::AppEvent;
use aquactl::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort, TimePort, WallTime};
use aquactl::control::fan::FanState;
use aquactl::control::feeding::{FeedSource, ValvePosition};
use aquactl::error::ClockError;
use aquactl::events::ManualFeedLatch;
use aquactl::sensors::temperature::TemperatureReading;
use embedded_hal::delay::DelayNs;

pub const COLS: usize = 16;

/// Simulated DS18B20 conversion time.
pub const CONVERSION_MS: u32 = 750;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Valve(ValvePosition),
    Fan(FanState),
    PhLed(bool),
    Delay(u32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware<'a> {
    pub calls: Vec<HwCall>,
    pub screen: [[u8; COLS]; 2],
    pub now_ms: u32,
    pub clock_present: bool,
    pub wall_time: Result<WallTime, ClockError>,
    pub ph_raw: u16,
    /// Consumed one per read; the last one repeats once the queue is empty.
    pub temperatures: VecDeque<TemperatureReading>,
    last_temperature: TemperatureReading,
    latch: Option<&'a ManualFeedLatch>,
    presses: VecDeque<u32>,
    pub accepted_presses: u32,
    /// Both rows as they looked when the valve last opened.
    pub row0_at_open: Option<String>,
    pub row1_at_open: Option<String>,
    valve: Option<ValvePosition>,
}

#[allow(dead_code)]
impl<'a> MockHardware<'a> {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            screen: [[b' '; COLS]; 2],
            now_ms: 0,
            clock_present: true,
            wall_time: Ok(WallTime { hour: 14, minute: 5, second: 0 }),
            // ≈ 2.00 V on the 10-bit scale
            ph_raw: 409,
            temperatures: VecDeque::new(),
            last_temperature: TemperatureReading::Celsius(25.0),
            latch: None,
            presses: VecDeque::new(),
            accepted_presses: 0,
            row0_at_open: None,
            row1_at_open: None,
            valve: None,
        }
    }

    /// Route scheduled button presses into `latch`.
    pub fn with_button(latch: &'a ManualFeedLatch) -> Self {
        Self {
            latch: Some(latch),
            ..Self::new()
        }
    }

    /// Schedule a falling edge at absolute clock value `at_ms`. Presses
    /// must be scheduled in order.
    pub fn press_at(&mut self, at_ms: u32) {
        self.presses.push_back(at_ms);
    }

    /// Press the button right now.
    pub fn press_now(&mut self) {
        self.press_at(self.now_ms);
        self.fire_due_presses();
    }

    pub fn push_temperatures(&mut self, readings: &[TemperatureReading]) {
        self.temperatures.extend(readings.iter().copied());
    }

    pub fn row(&self, r: usize) -> String {
        String::from_utf8_lossy(&self.screen[r]).into_owned()
    }

    pub fn valve(&self) -> Option<ValvePosition> {
        self.valve
    }

    pub fn fan_calls(&self) -> Vec<FanState> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Fan(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn valve_calls(&self) -> Vec<ValvePosition> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Valve(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
        self.fire_due_presses();
    }

    fn fire_due_presses(&mut self) {
        while let Some(&at) = self.presses.front() {
            if at > self.now_ms {
                break;
            }
            self.presses.pop_front();
            if let Some(latch) = self.latch {
                if latch.trigger(at) {
                    self.accepted_presses += 1;
                }
            }
        }
    }
}

impl Default for MockHardware<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware<'_> {
    fn sample_ph(&mut self) -> u16 {
        self.ph_raw
    }

    fn request_temperature(&mut self) {
        self.advance(CONVERSION_MS);
    }

    fn read_temperature(&mut self) -> TemperatureReading {
        if let Some(t) = self.temperatures.pop_front() {
            self.last_temperature = t;
        }
        self.last_temperature
    }
}

impl ActuatorPort for MockHardware<'_> {
    fn set_valve(&mut self, position: ValvePosition) {
        if position == ValvePosition::Open {
            self.row0_at_open = Some(self.row(0));
            self.row1_at_open = Some(self.row(1));
        }
        self.valve = Some(position);
        self.calls.push(HwCall::Valve(position));
    }

    fn set_fan(&mut self, state: FanState) {
        self.calls.push(HwCall::Fan(state));
    }

    fn set_ph_led(&mut self, on: bool) {
        self.calls.push(HwCall::PhLed(on));
    }
}

impl TimePort for MockHardware<'_> {
    fn init_clock(&mut self) -> Result<(), ClockError> {
        if self.clock_present {
            Ok(())
        } else {
            Err(ClockError::NotResponding)
        }
    }

    fn wall_time(&mut self) -> Result<WallTime, ClockError> {
        self.wall_time
    }

    fn uptime_ms(&self) -> u32 {
        self.now_ms
    }
}

impl DisplayPort for MockHardware<'_> {
    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        let Some(line) = self.screen.get_mut(row as usize) else {
            return;
        };
        for (i, b) in text.bytes().enumerate() {
            if let Some(cell) = line.get_mut(col as usize + i) {
                *cell = b;
            }
        }
    }
}

impl DelayNs for MockHardware<'_> {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(HwCall::Delay(ms));
        self.advance(ms);
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn feeds_requested(&self) -> Vec<(FeedSource, u32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::FeedRequested(ev) => Some((ev.source, ev.at_ms)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
