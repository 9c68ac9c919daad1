//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                         |
//! |------------|---------------|-------------------------------------|
//! | `hardware` | SensorPort    | ESP32 ADC, DS18B20 on 1-Wire        |
//! |            | ActuatorPort  | Servo PWM, fan relay, pH LED        |
//! |            | TimePort      | DS3231 over I2C, ESP32 system timer |
//! |            | DisplayPort   | HD44780 LCD via PCF8574 over I2C    |
//! | `log_sink` | EventSink     | Serial log output                   |
//! | `time`     | (monotonic)   | ESP32 system timer                  |

pub mod hardware;
pub mod log_sink;
pub mod time;
