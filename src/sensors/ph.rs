//! Analog pH probe sampler.
//!
//! Takes a burst of raw ADC samples with a short gap between each to
//! average out amplifier noise, converts the mean to volts against the
//! ADC reference, then applies a two-point linear calibration.
//!
//! There is no error path: a disconnected probe simply yields whatever
//! the floating input averages to.

use embedded_hal::delay::DelayNs;

use crate::app::ports::SensorPort;
use crate::config::ControllerConfig;

/// `pH = volts * slope + offset`, fitted from two buffer solutions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub slope: f32,
    pub offset: f32,
}

impl Calibration {
    pub fn volts_to_ph(&self, volts: f32) -> f32 {
        volts * self.slope + self.offset
    }
}

pub struct PhSampler {
    cal: Calibration,
    samples: u8,
    sample_delay_ms: u32,
    reference_volts: f32,
    resolution: f32,
}

impl PhSampler {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            cal: Calibration {
                slope: config.ph_slope,
                offset: config.ph_offset,
            },
            samples: config.ph_samples.max(1),
            sample_delay_ms: config.ph_sample_delay_ms,
            reference_volts: config.adc_reference_volts,
            resolution: config.adc_resolution as f32,
        }
    }

    /// Sample, average and convert. Blocks for `samples * sample_delay_ms`.
    pub fn read(&self, hw: &mut (impl SensorPort + DelayNs)) -> f32 {
        let mut sum: u32 = 0;
        for _ in 0..self.samples {
            sum += u32::from(hw.sample_ph());
            hw.delay_ms(self.sample_delay_ms);
        }
        let mean = sum as f32 / f32::from(self.samples);
        self.cal.volts_to_ph(self.counts_to_volts(mean))
    }

    /// Mean ADC counts to volts.
    pub fn counts_to_volts(&self, counts: f32) -> f32 {
        counts * self.reference_volts / self.resolution
    }

    pub fn calibration(&self) -> Calibration {
        self.cal
    }
}

/// Re-expresses a calibrated millivolt reading as counts on the configured
/// reference and resolution, which is the scale the pH calibration was
/// fitted against. Lets an ADC with a different range feed the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountScale {
    reference_mv: u32,
    resolution: u32,
}

impl CountScale {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            reference_mv: ((config.adc_reference_volts * 1000.0) as u32).max(1),
            resolution: u32::from(config.adc_resolution),
        }
    }

    /// Nearest count, saturating at the top code.
    pub fn counts(&self, millivolts: u16) -> u16 {
        let scaled = (u32::from(millivolts) * self.resolution + self.reference_mv / 2) / self.reference_mv;
        scaled.min(self.resolution.saturating_sub(1)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::temperature::TemperatureReading;

    struct ScriptedAdc {
        samples: Vec<u16>,
        next: usize,
        delays_ms: Vec<u32>,
    }

    impl ScriptedAdc {
        fn new(samples: Vec<u16>) -> Self {
            Self { samples, next: 0, delays_ms: Vec::new() }
        }
    }

    impl SensorPort for ScriptedAdc {
        fn sample_ph(&mut self) -> u16 {
            let v = self.samples[self.next % self.samples.len()];
            self.next += 1;
            v
        }
        fn request_temperature(&mut self) {}
        fn read_temperature(&mut self) -> TemperatureReading {
            TemperatureReading::Disconnected
        }
    }

    impl DelayNs for ScriptedAdc {
        fn delay_ns(&mut self, _ns: u32) {}
        fn delay_ms(&mut self, ms: u32) {
            self.delays_ms.push(ms);
        }
    }

    #[test]
    fn two_volts_reads_14_62() {
        let sampler = PhSampler::new(&ControllerConfig::DEFAULT);
        let ph = sampler.calibration().volts_to_ph(2.00);
        assert!((ph - 14.62).abs() < 0.005, "got {ph}");
    }

    #[test]
    fn averages_ten_samples_with_gaps() {
        let sampler = PhSampler::new(&ControllerConfig::DEFAULT);
        // 409 and 410 alternate to a mean of 409.5 counts ≈ 2.00 V.
        let mut adc = ScriptedAdc::new(vec![409, 410]);
        let ph = sampler.read(&mut adc);
        assert_eq!(adc.next, 10);
        assert_eq!(adc.delays_ms, vec![10; 10]);
        assert!((ph - 14.62).abs() < 0.005, "got {ph}");
    }

    #[test]
    fn counts_to_volts_spans_reference() {
        let sampler = PhSampler::new(&ControllerConfig::DEFAULT);
        assert_eq!(sampler.counts_to_volts(0.0), 0.0);
        assert!((sampler.counts_to_volts(1024.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn two_volts_lands_on_the_calibration_scale() {
        let scale = CountScale::new(&ControllerConfig::DEFAULT);
        assert_eq!(scale.counts(0), 0);
        assert_eq!(scale.counts(2_000), 410);
        assert_eq!(scale.counts(2_500), 512);
    }

    #[test]
    fn counts_saturate_at_top_code() {
        let scale = CountScale::new(&ControllerConfig::DEFAULT);
        assert_eq!(scale.counts(5_000), 1023);
        assert_eq!(scale.counts(u16::MAX), 1023);
    }

    #[test]
    fn floating_input_still_returns_a_number() {
        let sampler = PhSampler::new(&ControllerConfig::DEFAULT);
        let mut adc = ScriptedAdc::new(vec![1023]);
        assert!(sampler.read(&mut adc).is_finite());
    }
}
