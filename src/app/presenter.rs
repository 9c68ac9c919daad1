//! Status presenter for the 2 x 16 character layout.
//!
//! ```text
//!   col  0         1
//!        0123456789012345
//!   row0 pH:7.12   14:05
//!   row1 Temp:26.4CREADY
//! ```
//!
//! | Field       | Row | Col | Width | Content                         |
//! |-------------|-----|-----|-------|---------------------------------|
//! | pH value    | 0   | 3   | 5     | two decimals                    |
//! | time        | 0   | 11  | 5     | `HH:MM`                         |
//! | temperature | 1   | 5   | 5     | one decimal + `C`, or `ERROR`   |
//! | mode        | 1   | 10  | 6     | `READY ` `MANUAL` `AUTO  ` `FAN:ON` |
//!
//! Every field is written padded to its width so a shorter value never
//! leaves stale characters behind.

use core::fmt::Write;

use heapless::String;

use super::ports::{DisplayPort, WallTime};
use crate::sensors::temperature::TemperatureReading;

pub const COLS: u8 = 16;
pub const ROWS: u8 = 2;

const PH_COL: u8 = 3;
const PH_WIDTH: usize = 5;
const TIME_COL: u8 = 11;
const TIME_WIDTH: usize = 5;
const TEMP_COL: u8 = 5;
const TEMP_WIDTH: usize = 5;
const MODE_COL: u8 = 10;
const MODE_WIDTH: usize = 6;

/// What the mode slot on row 1 currently says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
    Ready,
    Manual,
    Auto,
    FanOn,
}

impl StatusMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "READY ",
            Self::Manual => "MANUAL",
            Self::Auto => "AUTO  ",
            Self::FanOn => "FAN:ON",
        }
    }
}

pub struct StatusPresenter {
    mode: StatusMode,
}

impl Default for StatusPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPresenter {
    pub fn new() -> Self {
        Self {
            mode: StatusMode::Ready,
        }
    }

    /// Static labels drawn once at boot.
    pub fn draw_layout(&mut self, d: &mut impl DisplayPort) {
        d.write_at(0, 0, "pH:      ");
        d.write_at(1, 0, "Temp:");
        self.show_mode(d, StatusMode::Ready);
    }

    /// Startup failure screen. Nothing else is drawn after this.
    pub fn show_clock_error(&mut self, d: &mut impl DisplayPort) {
        d.write_at(0, 0, "RTC Error!");
    }

    pub fn show_time(&mut self, d: &mut impl DisplayPort, t: WallTime) {
        let mut buf: String<8> = String::new();
        if write!(buf, "{:02}:{:02}", t.hour, t.minute).is_err() {
            buf.clear();
        }
        field(d, 0, TIME_COL, TIME_WIDTH, &buf);
    }

    pub fn show_time_unavailable(&mut self, d: &mut impl DisplayPort) {
        field(d, 0, TIME_COL, TIME_WIDTH, "--:--");
    }

    pub fn show_mode(&mut self, d: &mut impl DisplayPort, mode: StatusMode) {
        self.mode = mode;
        field(d, 1, MODE_COL, MODE_WIDTH, mode.label());
    }

    /// Row 0 is taken over for the duration of a feed.
    pub fn show_feeding_banner(&mut self, d: &mut impl DisplayPort) {
        d.write_at(0, 0, "FEEDING...      ");
    }

    /// Put the row 0 label back after a feed. The time slot is redrawn on
    /// the next iteration.
    pub fn restore_ph_label(&mut self, d: &mut impl DisplayPort) {
        d.write_at(0, 0, "pH:      ");
    }

    pub fn show_ph(&mut self, d: &mut impl DisplayPort, ph: f32) {
        let mut buf: String<16> = String::new();
        if write!(buf, "{:.2}", ph).is_err() {
            buf.clear();
        }
        field(d, 0, PH_COL, PH_WIDTH, &buf);
    }

    pub fn show_temperature(&mut self, d: &mut impl DisplayPort, reading: TemperatureReading) {
        match reading {
            TemperatureReading::Celsius(c) => {
                field(d, 1, TEMP_COL, TEMP_WIDTH, &celsius_text(c));
            }
            TemperatureReading::Disconnected => {
                field(d, 1, TEMP_COL, TEMP_WIDTH, "ERROR");
            }
        }
    }

    pub fn mode(&self) -> StatusMode {
        self.mode
    }
}

/// One decimal when it fits the slot, whole degrees otherwise, so the unit
/// is never cut off. Values no probe can report fall back to `ERROR`.
fn celsius_text(c: f32) -> String<16> {
    let mut buf: String<16> = String::new();
    for precision in [1, 0] {
        buf.clear();
        if write!(buf, "{:.*}C", precision, c).is_ok() && buf.len() <= TEMP_WIDTH {
            return buf;
        }
    }
    buf.clear();
    let _ = buf.push_str("ERROR");
    buf
}

/// Write `text` left-aligned in a fixed-width field, padding or truncating.
fn field(d: &mut impl DisplayPort, row: u8, col: u8, width: usize, text: &str) {
    let mut buf: String<16> = String::new();
    // Width never exceeds the row, so this cannot overflow.
    let _ = write!(buf, "{:<w$.w$}", text, w = width);
    d.write_at(row, col, &buf);
}
