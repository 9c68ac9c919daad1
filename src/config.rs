//! Controller constants
//!
//! Every threshold, interval and calibration value used by the control
//! loop. There is no runtime mutation path: the loop is built from
//! [`ControllerConfig::DEFAULT`] at boot and keeps it for its lifetime.

use serde::{Deserialize, Serialize};

/// Core controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Fan hysteresis ---
    /// Fan switches on at or above this temperature (Celsius)
    pub fan_on_c: f32,
    /// Fan switches off at or below this temperature (Celsius)
    pub fan_off_c: f32,

    // --- Feeding ---
    /// Minimum gap between two accepted manual triggers (milliseconds)
    pub debounce_ms: u32,
    /// Automatic feed period (milliseconds)
    pub auto_feed_interval_ms: u32,
    /// How long the valve stays open per feed (milliseconds)
    pub feed_hold_ms: u32,
    /// Pause after a feed before the mode slot returns to READY (milliseconds)
    pub feed_settle_ms: u32,
    /// Servo angle for a closed valve (degrees)
    pub valve_closed_deg: u8,
    /// Servo angle for an open valve (degrees)
    pub valve_open_deg: u8,

    // --- pH sampler ---
    /// Raw samples averaged per reading
    pub ph_samples: u8,
    /// Gap between successive raw samples (milliseconds)
    pub ph_sample_delay_ms: u32,
    /// ADC reference voltage (volts)
    pub adc_reference_volts: f32,
    /// Number of ADC codes (2^bits)
    pub adc_resolution: u16,
    /// Linear calibration: pH = volts * slope + offset
    pub ph_slope: f32,
    pub ph_offset: f32,

    // --- Timing ---
    /// Fixed pause at the end of each loop iteration (milliseconds)
    pub loop_delay_ms: u32,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        // Fan
        fan_on_c: 30.0,
        fan_off_c: 28.0,

        // Feeding
        debounce_ms: 500,
        auto_feed_interval_ms: 60_000, // 1/min
        feed_hold_ms: 1_000,
        feed_settle_ms: 1_000,
        valve_closed_deg: 0,
        valve_open_deg: 90,

        // pH
        ph_samples: 10,
        ph_sample_delay_ms: 10,
        adc_reference_volts: 5.0, // external reference
        adc_resolution: 1024,     // 10-bit
        ph_slope: -8.041_885,
        ph_offset: 30.701_568,

        // Timing
        loop_delay_ms: 750,
    };

    /// Highest raw code the ADC can return.
    pub const fn adc_max(&self) -> u16 {
        self.adc_resolution - 1
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
