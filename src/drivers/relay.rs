//! Plain on/off digital outputs: fan relay and pH alert LED.
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: tracks the level in memory only.

use crate::drivers::hw_init;

pub struct DigitalOutput {
    gpio: i32,
    high: bool,
}

impl DigitalOutput {
    /// Wraps a pin already configured as an output by `hw_init`.
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn set(&mut self, high: bool) {
        hw_init::gpio_write(self.gpio, high);
        self.high = high;
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}
