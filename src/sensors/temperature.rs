//! Water temperature reading.
//!
//! The probe is a DS18B20 on a One-Wire bus (see `drivers::ds18b20`). A
//! probe that stops answering is not an error for the loop: it becomes a
//! [`TemperatureReading::Disconnected`] that the presenter shows and the
//! fan controller ignores.

/// Value the Dallas driver family uses to mean "no device".
pub const DISCONNECTED_C: f32 = -127.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureReading {
    Celsius(f32),
    Disconnected,
}

impl TemperatureReading {
    /// Classify a raw Celsius value, folding the sentinel and NaN into
    /// `Disconnected`.
    pub fn from_celsius(celsius: f32) -> Self {
        if celsius.is_nan() || celsius <= DISCONNECTED_C {
            Self::Disconnected
        } else {
            Self::Celsius(celsius)
        }
    }

    pub fn celsius(self) -> Option<f32> {
        match self {
            Self::Celsius(c) => Some(c),
            Self::Disconnected => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Celsius(_))
    }
}

/// Convert the two temperature bytes of a DS18B20 scratchpad (LSB first,
/// two's complement, 1/16 °C per bit) to Celsius.
pub fn scratchpad_to_celsius(lsb: u8, msb: u8) -> f32 {
    i16::from_le_bytes([lsb, msb]) as f32 / 16.0
}
