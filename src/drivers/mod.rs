//! Peripheral drivers and one-shot hardware initialisation.
//!
//! `hw_init`, `valve` and `relay` drive ESP32 peripherals through raw
//! esp-idf-sys calls (simulated on the host). `onewire`, `ds18b20`,
//! `ds3231` and `lcd` are written against `embedded-hal` traits only.

pub mod ds18b20;
pub mod ds3231;
pub mod hw_init;
pub mod lcd;
pub mod onewire;
pub mod relay;
pub mod valve;
