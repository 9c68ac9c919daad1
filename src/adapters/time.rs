//! ESP32 monotonic time adapter.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! Milliseconds are truncated to `u32`, which wraps after ~49.7 days;
//! consumers compare with `wrapping_sub`. Wall-clock time comes from the
//! RTC, not from here.

/// Milliseconds since boot. Safe from interrupt context.
#[cfg(target_os = "espidf")]
pub fn monotonic_ms() -> u32 {
    // SAFETY: esp_timer_get_time reads the RTC counter; safe from any context.
    ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
}

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX`).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        monotonic_ms()
    }

    /// Milliseconds since this adapter was created (monotonic, wraps at
    /// `u32::MAX`).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let t = Esp32TimeAdapter::new();
        let a = t.uptime_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = t.uptime_ms();
        assert!(b.wrapping_sub(a) >= 5);
    }
}
