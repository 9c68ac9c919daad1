//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the shared I2C bus (RTC + LCD backpack), the 1-Wire bus, the
//! valve servo, both digital outputs and the blocking delay, exposing them
//! through every port the [`AquariumService`](crate::app::service::AquariumService)
//! needs. This is the only module in the system that touches actual
//! hardware. On non-espidf targets, the raw GPIO/ADC/LEDC helpers use
//! cfg-gated simulation stubs, so the adapter also runs on the host with
//! fake bus and pin types.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort, TimePort, WallTime};
use crate::config::ControllerConfig;
use crate::control::fan::FanState;
use crate::control::feeding::ValvePosition;
use crate::drivers::ds18b20::Ds18b20;
use crate::drivers::ds3231::Ds3231;
use crate::drivers::hw_init;
use crate::drivers::lcd::{self, Lcd};
use crate::drivers::onewire::OneWire;
use crate::drivers::relay::DigitalOutput;
use crate::drivers::valve::ValveServo;
use crate::error::{ClockError, Error};
use crate::pins;
use crate::sensors::ph::CountScale;
use crate::sensors::temperature::TemperatureReading;

use super::time::Esp32TimeAdapter;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C, OW, D> {
    i2c: I2C,
    wire: OneWire<OW>,
    delay: D,
    probe: Ds18b20,
    rtc: Ds3231,
    lcd: Lcd,
    /// Set once the panel answered its init sequence; until then display
    /// writes are dropped.
    lcd_ready: bool,
    ph_scale: CountScale,
    valve: ValveServo,
    fan: DigitalOutput,
    ph_led: DigitalOutput,
    clock: Esp32TimeAdapter,
    /// Whether the last conversion request reached the probe.
    converted: bool,
}

impl<I2C, OW, D> HardwareAdapter<I2C, OW, D>
where
    I2C: I2c,
    OW: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(i2c: I2C, one_wire_pin: OW, delay: D, config: &ControllerConfig) -> Result<Self, Error> {
        let wire = OneWire::new(one_wire_pin).map_err(Error::OneWire)?;
        Ok(Self {
            i2c,
            wire,
            delay,
            probe: Ds18b20::new(),
            rtc: Ds3231::new(),
            lcd: Lcd::new(lcd::ADDRESS),
            lcd_ready: false,
            ph_scale: CountScale::new(config),
            valve: ValveServo::new(config.valve_closed_deg, config.valve_open_deg),
            fan: DigitalOutput::new(pins::FAN_GPIO),
            ph_led: DigitalOutput::new(pins::PH_LED_GPIO),
            clock: Esp32TimeAdapter::new(),
            converted: false,
        })
    }

    /// Bring up the temperature probe and the display.
    ///
    /// A missing probe only degrades readings. A missing display is
    /// reported as an error and leaves every later display write a no-op.
    pub fn init(&mut self) -> Result<(), Error> {
        match self.probe.configure(&mut self.wire, &mut self.delay) {
            Ok(()) => info!("DS18B20 set to 12-bit"),
            Err(e) => warn!("DS18B20 not configured: {}", e),
        }

        self.lcd
            .init(&mut self.i2c, &mut self.delay)
            .map_err(|_| Error::Init("LCD not responding"))?;
        self.lcd_ready = true;
        info!("LCD ready at 0x{:02X}", lcd::ADDRESS);
        Ok(())
    }

    pub fn display_ready(&self) -> bool {
        self.lcd_ready
    }

    pub fn valve_angle_deg(&self) -> Option<u16> {
        self.valve.angle_deg()
    }

    pub fn fan_output(&self) -> bool {
        self.fan.is_high()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I2C, OW, D> SensorPort for HardwareAdapter<I2C, OW, D>
where
    I2C: I2c,
    OW: InputPin + OutputPin,
    D: DelayNs,
{
    /// Calibrated millivolts from the ESP32 ADC, re-expressed on the
    /// reference and resolution the pH calibration was fitted against.
    fn sample_ph(&mut self) -> u16 {
        self.ph_scale.counts(hw_init::adc1_read_mv(hw_init::ADC1_CH_PH))
    }

    fn request_temperature(&mut self) {
        self.converted = match self.probe.convert(&mut self.wire, &mut self.delay) {
            Ok(()) => true,
            Err(e) => {
                warn!("DS18B20 convert failed: {}", e);
                false
            }
        };
    }

    fn read_temperature(&mut self) -> TemperatureReading {
        if !self.converted {
            return TemperatureReading::Disconnected;
        }
        match self.probe.read_celsius(&mut self.wire, &mut self.delay) {
            Ok(c) => TemperatureReading::from_celsius(c),
            Err(e) => {
                warn!("DS18B20 read failed: {}", e);
                TemperatureReading::Disconnected
            }
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I2C, OW, D> ActuatorPort for HardwareAdapter<I2C, OW, D> {
    fn set_valve(&mut self, position: ValvePosition) {
        self.valve.set(position);
    }

    fn set_fan(&mut self, state: FanState) {
        self.fan.set(state.is_on());
    }

    fn set_ph_led(&mut self, on: bool) {
        self.ph_led.set(on);
    }
}

// ── TimePort implementation ───────────────────────────────────

impl<I2C, OW, D> TimePort for HardwareAdapter<I2C, OW, D>
where
    I2C: I2c,
{
    fn init_clock(&mut self) -> Result<(), ClockError> {
        self.rtc.probe(&mut self.i2c)?;
        info!("RTC found at 0x{:02X}", crate::drivers::ds3231::ADDRESS);
        Ok(())
    }

    fn wall_time(&mut self) -> Result<WallTime, ClockError> {
        self.rtc.now(&mut self.i2c)
    }

    fn uptime_ms(&self) -> u32 {
        self.clock.uptime_ms()
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<I2C, OW, D> DisplayPort for HardwareAdapter<I2C, OW, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        if !self.lcd_ready {
            return;
        }
        if let Err(e) = self.lcd.print_at(&mut self.i2c, row, col, text, &mut self.delay) {
            warn!("LCD write failed at ({},{}): {:?}", row, col, e);
        }
    }
}

// ── DelayNs (bounded blocking waits) ──────────────────────────

impl<I2C, OW, D> DelayNs for HardwareAdapter<I2C, OW, D>
where
    D: DelayNs,
{
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
