//! One-shot hardware peripheral initialization.
//!
//! Configures the pH ADC channel, GPIO directions, the servo LEDC
//! timer/channel and the feed button interrupt using raw ESP-IDF sys
//! calls. Called once from `main()` before the control loop starts.
//!
//! The I2C bus and the One-Wire pin are owned by esp-idf-hal drivers
//! created in `main`, not configured here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::Init("peripheral init")
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

pub const ADC1_CH_PH: u32 = 6;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut ADC1_CALI: adc_cali_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation covers the amplifier's full swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_PH, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // Raw codes at 12 dB only span ~3.1 V and are not linear near the
    // rails; the eFuse curve-fitting scheme turns them into millivolts.
    let cali_cfg = adc_cali_curve_fitting_config_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        chan: ADC1_CH_PH,
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: ADC1_CALI is only written here, once at boot.
    let ret = unsafe { adc_cali_create_scheme_curve_fitting(&cali_cfg, &raw mut ADC1_CALI) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 configured (CH{}=pH on GPIO{})", ADC1_CH_PH, pins::PH_ADC_GPIO);
    Ok(())
}

/// One calibrated conversion in millivolts. A failed read yields 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read_mv(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    let mut mv: i32 = 0;
    // SAFETY: adc1_handle() contract; ADC1_CALI is set once in init_adc().
    // Single-threaded main-loop access only.
    unsafe {
        if adc_oneshot_read(adc1_handle(), channel, &mut raw) != ESP_OK as i32 {
            return 0;
        }
        if adc_cali_raw_to_voltage(ADC1_CALI, raw, &mut mv) != ESP_OK as i32 {
            return 0;
        }
    }
    mv.clamp(0, i32::from(u16::MAX)) as u16
}

/// Full-scale input of the simulated channel at 12 dB attenuation.
#[cfg(not(target_os = "espidf"))]
pub const SIM_ADC_FULL_SCALE_MV: u32 = 3_100;

#[cfg(not(target_os = "espidf"))]
static SIM_ADC_RAW: core::sync::atomic::AtomicU16 = core::sync::atomic::AtomicU16::new(0);

/// Host builds: set the raw 12-bit code every subsequent read converts.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_raw(raw: u16) {
    SIM_ADC_RAW.store(raw.min(4_095), core::sync::atomic::Ordering::Relaxed);
}

/// Host builds: a linear stand-in for the eFuse calibration curve.
#[cfg(not(target_os = "espidf"))]
pub fn adc1_read_mv(_channel: u32) -> u16 {
    let raw = u32::from(SIM_ADC_RAW.load(core::sync::atomic::Ordering::Relaxed));
    (raw * SIM_ADC_FULL_SCALE_MV / 4_095) as u16
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Active-low button; the interrupt type is set again when the ISR is
    // attached in init_isr_service().
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::FEED_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: feed button configured (GPIO{})", pins::FEED_BUTTON_GPIO);
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::FAN_GPIO,
        pins::PH_LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (fan, pH LED)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM (servo) ──────────────────────────────────────────

pub const LEDC_CH_SERVO: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: servo frame (50 Hz, 14-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::SERVO_PWM_RESOLUTION_BITS,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from single main-task context via init_peripherals().
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 0: servo signal, idle low until the first set_valve()
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SERVO,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (servo=CH{})", LEDC_CH_SERVO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: the channel was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::adapters::time::monotonic_ms;
#[cfg(target_os = "espidf")]
use crate::events::manual_feed_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn feed_button_isr(_arg: *mut core::ffi::c_void) {
    manual_feed_isr_handler(monotonic_ms());
}

/// Install the per-pin GPIO ISR service and attach the feed button.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed. The handler registered below only
    // touches the lock-free feed latch.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Feed button: falling edge (active-low with pull-up already configured)
        gpio_set_intr_type(pins::FEED_BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::FEED_BUTTON_GPIO, Some(feed_button_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::FEED_BUTTON_GPIO);

        info!("hw_init: ISR service installed (feed button)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
