//! Aquarium controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod pins;

// The raw-peripheral helpers inside these carry their own cfg guards, so
// the modules build on the host as well.
pub mod adapters;
pub mod control;
pub mod drivers;
pub mod sensors;
