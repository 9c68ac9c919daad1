//! Fuzz target: LCD status fields
//!
//! Formats arbitrary pH and temperature values, including NaN, infinities
//! and huge magnitudes, and verifies:
//! - No panics in the fixed-capacity formatting path
//! - Every write stays on the 2 x 16 panel
//! - pH and temperature never spill into the neighbouring slot
//!
//! cargo fuzz run fuzz_status_fields

#![no_main]

use aquactl::app::ports::DisplayPort;
use aquactl::app::presenter::{StatusPresenter, COLS, ROWS};
use aquactl::sensors::temperature::TemperatureReading;
use libfuzzer_sys::fuzz_target;

struct Panel {
    /// (row, first col, one past last col) of every write.
    spans: Vec<(u8, usize, usize)>,
}

impl DisplayPort for Panel {
    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        self.spans.push((row, col as usize, col as usize + text.len()));
    }
}

fuzz_target!(|input: (f32, f32)| {
    let (ph, celsius) = input;
    let mut panel = Panel { spans: Vec::new() };
    let mut presenter = StatusPresenter::new();

    presenter.show_ph(&mut panel, ph);
    presenter.show_temperature(&mut panel, TemperatureReading::from_celsius(celsius));

    for &(row, start, end) in &panel.spans {
        assert!(row < ROWS, "row {} off panel", row);
        assert!(end <= COLS as usize, "write {}..{} past column {}", start, end, COLS);
    }

    // pH sits in 3..8 ahead of the clock; temperature in 5..10 ahead of the mode slot.
    assert_eq!(panel.spans[0], (0, 3, 8));
    assert_eq!(panel.spans[1], (1, 5, 10));
});
