//! GPIO / peripheral pin assignments for the aquarium controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. `main` picks the matching `peripherals.pins`
//! fields for the pins owned by esp-idf-hal drivers (One-Wire, I2C).

// ---------------------------------------------------------------------------
// Temperature probe (DS18B20, One-Wire, 4.7 kOhm pull-up)
// ---------------------------------------------------------------------------

/// Open-drain data line.
pub const ONE_WIRE_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Feeder valve (hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output to the servo signal wire.
pub const SERVO_GPIO: i32 = 3;
/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC duty resolution for the servo channel (bits).
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// Manual feed button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

pub const FEED_BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// pH probe amplifier, analog voltage
// ---------------------------------------------------------------------------

/// ADC1 channel 6 (GPIO 7 on ESP32-S3).
pub const PH_ADC_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// I2C bus (DS3231 RTC + PCF8574 LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
pub const I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Digital outputs
// ---------------------------------------------------------------------------

/// pH alert indicator LED (active HIGH).
pub const PH_LED_GPIO: i32 = 10;
/// Cooling fan relay (active HIGH).
pub const FAN_GPIO: i32 = 11;
