//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the aquarium control loop: feed arbitration, fan
//! hysteresis and status presentation. All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod presenter;
pub mod service;
