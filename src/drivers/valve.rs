//! Feeder valve on a hobby servo.
//!
//! The servo reads a 50 Hz pulse train: 544 µs is 0°, 2400 µs is 180°.
//! The pulse width is produced by LEDC channel 0 at 14-bit resolution.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init helpers.
//! On host/test: tracks the commanded angle in memory only.

use crate::control::feeding::ValvePosition;
use crate::drivers::hw_init;
use crate::pins;

pub const MIN_PULSE_US: u32 = 544;
pub const MAX_PULSE_US: u32 = 2_400;
pub const MAX_ANGLE_DEG: u16 = 180;

const FRAME_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;
const DUTY_STEPS: u32 = 1 << pins::SERVO_PWM_RESOLUTION_BITS;

/// Pulse width for `angle` degrees, clamped to the servo's travel.
pub fn angle_to_pulse_us(angle_deg: u16) -> u32 {
    let angle = u32::from(angle_deg.min(MAX_ANGLE_DEG));
    MIN_PULSE_US + angle * (MAX_PULSE_US - MIN_PULSE_US) / u32::from(MAX_ANGLE_DEG)
}

/// LEDC duty counts for `angle` degrees.
pub fn angle_to_duty(angle_deg: u16) -> u32 {
    angle_to_pulse_us(angle_deg) * DUTY_STEPS / FRAME_US
}

pub struct ValveServo {
    closed_deg: u16,
    open_deg: u16,
    angle_deg: Option<u16>,
}

impl ValveServo {
    pub fn new(closed_deg: u8, open_deg: u8) -> Self {
        Self {
            closed_deg: u16::from(closed_deg),
            open_deg: u16::from(open_deg),
            angle_deg: None,
        }
    }

    pub fn set(&mut self, position: ValvePosition) {
        let angle = match position {
            ValvePosition::Closed => self.closed_deg,
            ValvePosition::Open => self.open_deg,
        };
        self.write_angle(angle);
    }

    /// Last commanded angle, `None` before the first command.
    pub fn angle_deg(&self) -> Option<u16> {
        self.angle_deg
    }

    fn write_angle(&mut self, angle_deg: u16) {
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, angle_to_duty(angle_deg));
        self.angle_deg = Some(angle_deg);
    }
}
