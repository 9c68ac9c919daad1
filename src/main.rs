//! Aquarium Controller Firmware: Main Entry Point
//!
//! Hexagonal architecture around a fixed-cadence polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                         LogEventSink          │
//! │  (Sensor+Actuator+Time+Display+Delay)    (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            AquariumService (pure logic)                │    │
//! │  │  Feed arbiter · Dispenser · Fan hysteresis · pH        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                          ▲                                     │
//! │        ManualFeedLatch ──┘ (written by the button ISR)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use embedded_hal::delay::DelayNs;
use esp_idf_svc::hal::delay::{Delay, FreeRtos};
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use log::{error, info, warn};

use aquactl::adapters::hardware::HardwareAdapter;
use aquactl::adapters::log_sink::LogEventSink;
use aquactl::app::service::AquariumService;
use aquactl::config::ControllerConfig;
use aquactl::drivers::hw_init;
use aquactl::events::MANUAL_FEED;
use aquactl::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  aquactl v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Raw peripherals (ADC, GPIO, LEDC) ──────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}; halting", e);
        halt();
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}; manual feeding disabled", e);
    }

    // ── 3. Bus drivers (I2C for RTC + LCD, 1-Wire probe) ──────
    let peripherals = Peripherals::take().context("Peripherals::take")?;
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ));
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &i2c_config,
    )
    .context("I2cDriver::new")?;
    let one_wire = PinDriver::input_output_od(peripherals.pins.gpio2)
        .context("PinDriver::input_output_od(1-Wire)")?;

    let config = ControllerConfig::DEFAULT;
    let mut hw = HardwareAdapter::new(i2c, one_wire, Delay::new_default(), &config)?;
    if let Err(e) = hw.init() {
        warn!("{}; running without display", e);
    }

    // ── 4. Control loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AquariumService::new(config, &MANUAL_FEED);

    if let Err(e) = app.start(&mut hw, &mut sink) {
        error!("Startup failed: {}; halting", e);
        halt();
    }

    loop {
        app.tick(&mut hw, &mut sink);
        hw.delay_ms(app.loop_delay_ms());
    }
}

/// Park the main task for good. Only a physical reset recovers.
fn halt() -> ! {
    loop {
        FreeRtos::delay_ms(1_000);
    }
}
