//! Application service: the control loop core.
//!
//! [`AquariumService`] owns the fan hysteresis, the feed arbiter and
//! dispenser, the pH sampler and the display presenter. All I/O flows
//! through the [`Board`] bundle and the [`EventSink`] injected at call
//! sites, so the whole loop runs against mock adapters on the host.
//!
//! ```text
//!   Board ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!             │        AquariumService        │
//!   Board ◀── │  Arbiter · Dispenser · Fan    │
//!             └──────────────────────────────┘
//!                  ▲ take()
//!                  │
//!           ManualFeedLatch ◀── button ISR
//! ```

use log::{debug, error, info, warn};

use crate::config::ControllerConfig;
use crate::control::fan::{FanController, FanState};
use crate::control::feeding::{FeedArbiter, FeedDispenser, FeedEvent, FeedSource, ValvePosition};
use crate::error::Error;
use crate::events::ManualFeedLatch;
use crate::sensors::ph::PhSampler;
use crate::sensors::temperature::TemperatureReading;

use super::events::{AppEvent, StatusReport};
use super::ports::{Board, EventSink};
use super::presenter::{StatusMode, StatusPresenter};

// ───────────────────────────────────────────────────────────────
// AquariumService
// ───────────────────────────────────────────────────────────────

pub struct AquariumService<'a> {
    config: ControllerConfig,
    latch: &'a ManualFeedLatch,
    fan: FanController,
    arbiter: FeedArbiter,
    dispenser: FeedDispenser,
    sampler: PhSampler,
    presenter: StatusPresenter,
    last_ph: f32,
    last_temperature: TemperatureReading,
    /// Reported but never raised; there is no pH threshold rule.
    ph_alert: bool,
    iterations: u32,
}

impl<'a> AquariumService<'a> {
    /// Build the service around the latch the button ISR writes into.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig, latch: &'a ManualFeedLatch) -> Self {
        Self {
            fan: FanController::new(&config),
            arbiter: FeedArbiter::new(&config, 0),
            dispenser: FeedDispenser::new(&config),
            sampler: PhSampler::new(&config),
            presenter: StatusPresenter::new(),
            config,
            latch,
            last_ph: 0.0,
            last_temperature: TemperatureReading::Disconnected,
            ph_alert: false,
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the controller to its initial state: clock up, fan off,
    /// valve closed, feed timer at "now", boot screen drawn.
    ///
    /// A clock failure leaves `RTC Error!` on the display and is returned
    /// to the caller, which is expected to halt.
    pub fn start(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) -> Result<(), Error> {
        if let Err(e) = hw.init_clock() {
            error!("Clock init failed: {}", e);
            self.presenter.show_clock_error(hw);
            sink.emit(&AppEvent::ClockFault(e));
            return Err(e.into());
        }

        hw.set_fan(FanState::Off);
        hw.set_ph_led(self.ph_alert);
        self.dispenser.close(hw);
        self.arbiter.reset(hw.uptime_ms());
        self.presenter.draw_layout(hw);

        sink.emit(&AppEvent::Started);
        info!(
            "Controller started (auto feed every {} ms)",
            self.config.auto_feed_interval_ms
        );
        Ok(())
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration: time → feeding → pH → temperature/fan →
    /// status line. The caller sleeps [`loop_delay_ms`](Self::loop_delay_ms)
    /// between iterations.
    pub fn tick(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) {
        self.iterations = self.iterations.wrapping_add(1);

        // 1. Wall clock
        match hw.wall_time() {
            Ok(t) => self.presenter.show_time(hw, t),
            Err(e) => {
                warn!("Clock read failed: {}", e);
                self.presenter.show_time_unavailable(hw);
                sink.emit(&AppEvent::ClockUnavailable(e));
            }
        }

        // 2./3. At most one feed per iteration, manual first
        let now = hw.uptime_ms();
        if let Some(event) = self.arbiter.poll(now, self.latch) {
            self.run_feed(event, hw, sink);
        }

        // 4. pH
        let ph = self.sampler.read(hw);
        self.last_ph = ph;
        self.presenter.show_ph(hw, ph);

        // 5. Temperature and fan
        hw.request_temperature();
        let reading = hw.read_temperature();
        self.last_temperature = reading;
        self.presenter.show_temperature(hw, reading);
        match reading.celsius() {
            Some(c) => self.update_fan(c, hw, sink),
            None => {
                warn!("Temperature probe disconnected; fan held {:?}", self.fan.state());
                sink.emit(&AppEvent::TemperatureFault);
            }
        }

        // 6. Consolidated status line
        sink.emit(&AppEvent::Status(self.status()));
        debug!(
            "iteration {} done; next auto feed in {} ms",
            self.iterations,
            self.arbiter.ms_until_auto(hw.uptime_ms())
        );
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the values the last iteration produced.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            ph: self.last_ph,
            temperature: self.last_temperature,
            fan: self.fan.state(),
            ph_alert: self.ph_alert,
            mode: self.presenter.mode(),
        }
    }

    pub fn fan_state(&self) -> FanState {
        self.fan.state()
    }

    pub fn valve_position(&self) -> ValvePosition {
        self.dispenser.position()
    }

    pub fn mode(&self) -> StatusMode {
        self.presenter.mode()
    }

    /// Feed sequences completed since [`start`](Self::start).
    pub fn feeds(&self) -> u32 {
        self.dispenser.feeds()
    }

    pub fn loop_delay_ms(&self) -> u32 {
        self.config.loop_delay_ms
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_feed(&mut self, event: FeedEvent, hw: &mut impl Board, sink: &mut impl EventSink) {
        let mode = match event.source {
            FeedSource::Manual => StatusMode::Manual,
            FeedSource::Auto => StatusMode::Auto,
        };
        self.presenter.show_mode(hw, mode);
        sink.emit(&AppEvent::FeedRequested(event));

        self.dispenser.dispense(event, hw, &mut self.presenter, sink);
        self.arbiter.complete(&event, hw.uptime_ms());
        sink.emit(&AppEvent::FeedCompleted(event));

        hw.delay_ms(self.config.feed_settle_ms);
        self.presenter.show_mode(hw, StatusMode::Ready);
    }

    fn update_fan(&mut self, celsius: f32, hw: &mut impl Board, sink: &mut impl EventSink) {
        let Some(state) = self.fan.update(celsius) else {
            return;
        };
        hw.set_fan(state);
        sink.emit(&AppEvent::FanChanged(state));

        // A waiting manual request owns the mode slot until it is served.
        if !self.latch.is_pending() {
            let mode = match state {
                FanState::On => StatusMode::FanOn,
                FanState::Off => StatusMode::Ready,
            };
            self.presenter.show_mode(hw, mode);
        }
    }
}
