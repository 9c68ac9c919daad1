//! Sensor subsystem: pH sampling and temperature readings.
//!
//! Both sensors are read through [`SensorPort`](crate::app::ports::SensorPort);
//! the modules here hold the conversion maths, which is hardware-free.

pub mod ph;
pub mod temperature;
