//! Cooling fan hysteresis controller.
//!
//! ```text
//!          temp >= on_at
//!   OFF ─────────────────▶ ON
//!    ▲                      │
//!    └──────────────────────┘
//!          temp <= off_at
//! ```
//!
//! Readings strictly inside `(off_at, on_at)` never change state. The
//! controller only sees valid readings; callers skip it entirely when the
//! probe is disconnected so the last state is held.

use crate::config::ControllerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanState {
    Off,
    On,
}

impl FanState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

pub struct FanController {
    on_at_c: f32,
    off_at_c: f32,
    state: FanState,
}

impl FanController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            on_at_c: config.fan_on_c,
            off_at_c: config.fan_off_c,
            state: FanState::Off,
        }
    }

    /// Feed one valid temperature reading.
    /// Returns the new state when a threshold crossing flips the fan.
    pub fn update(&mut self, celsius: f32) -> Option<FanState> {
        let next = match self.state {
            FanState::Off if celsius >= self.on_at_c => FanState::On,
            FanState::On if celsius <= self.off_at_c => FanState::Off,
            _ => return None,
        };
        self.state = next;
        Some(next)
    }

    pub fn state(&self) -> FanState {
        self.state
    }
}
