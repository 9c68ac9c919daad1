//! Feed request arbitration and the valve dispense sequence.
//!
//! ## Arbiter
//!
//! Two sources compete for the feeder each iteration:
//!
//! | Source | Condition                                  | Priority |
//! |--------|--------------------------------------------|----------|
//! | Manual | button latch pending                       | first    |
//! | Auto   | `now - last_auto_feed >= interval`         | second   |
//!
//! At most one [`FeedEvent`] is produced per poll. Completing any feed
//! restarts the auto interval from the completion time, so a manual feed
//! postpones the next automatic one by a full interval.
//!
//! ## Dispenser
//!
//! Blocking open → hold → close sequence. Nothing else in the loop runs
//! while the valve is open, which is what keeps feed sequences from
//! overlapping.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, DisplayPort, EventSink};
use crate::app::presenter::StatusPresenter;
use crate::config::ControllerConfig;
use crate::events::ManualFeedLatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Manual,
    Auto,
}

/// One arbitration decision, consumed exactly once by the dispenser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEvent {
    pub source: FeedSource,
    /// Monotonic time the decision was made.
    pub at_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValvePosition {
    Closed,
    Open,
}

// ───────────────────────────────────────────────────────────────
// Arbiter
// ───────────────────────────────────────────────────────────────

pub struct FeedArbiter {
    interval_ms: u32,
    last_auto_feed_ms: u32,
}

impl FeedArbiter {
    pub fn new(config: &ControllerConfig, now_ms: u32) -> Self {
        Self {
            interval_ms: config.auto_feed_interval_ms,
            last_auto_feed_ms: now_ms,
        }
    }

    /// Restart the auto interval from `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        self.last_auto_feed_ms = now_ms;
    }

    /// Decide whether to feed this iteration.
    ///
    /// A pending manual request is consumed here; if both sources are
    /// ready, manual wins and auto is reconsidered on the next poll.
    pub fn poll(&mut self, now_ms: u32, manual: &ManualFeedLatch) -> Option<FeedEvent> {
        if manual.take() {
            return Some(FeedEvent {
                source: FeedSource::Manual,
                at_ms: now_ms,
            });
        }
        if self.auto_due(now_ms) {
            return Some(FeedEvent {
                source: FeedSource::Auto,
                at_ms: now_ms,
            });
        }
        None
    }

    /// Record a finished feed of either kind.
    pub fn complete(&mut self, event: &FeedEvent, now_ms: u32) {
        self.last_auto_feed_ms = now_ms;
        debug!(
            "{:?} feed requested at {} ms done at {} ms; auto interval restarted",
            event.source, event.at_ms, now_ms
        );
    }

    pub fn auto_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_auto_feed_ms) >= self.interval_ms
    }

    /// Milliseconds until the next automatic feed (0 if overdue).
    pub fn ms_until_auto(&self, now_ms: u32) -> u32 {
        self.interval_ms
            .saturating_sub(now_ms.wrapping_sub(self.last_auto_feed_ms))
    }
}

// ───────────────────────────────────────────────────────────────
// Dispenser
// ───────────────────────────────────────────────────────────────

pub struct FeedDispenser {
    hold_ms: u32,
    position: ValvePosition,
    feeds: u32,
}

impl FeedDispenser {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            hold_ms: config.feed_hold_ms,
            position: ValvePosition::Closed,
            feeds: 0,
        }
    }

    /// Force the valve to its rest position (startup).
    pub fn close(&mut self, hw: &mut impl ActuatorPort) {
        hw.set_valve(ValvePosition::Closed);
        self.position = ValvePosition::Closed;
    }

    /// Run one full feed sequence. Returns with the valve closed.
    ///
    /// The actuator has no feedback line, so every move is assumed to land.
    pub fn dispense(
        &mut self,
        event: FeedEvent,
        hw: &mut (impl ActuatorPort + DisplayPort + DelayNs),
        presenter: &mut StatusPresenter,
        sink: &mut impl EventSink,
    ) {
        presenter.show_feeding_banner(hw);

        hw.set_valve(ValvePosition::Open);
        self.position = ValvePosition::Open;
        sink.emit(&AppEvent::ValveMoved(ValvePosition::Open));

        hw.delay_ms(self.hold_ms);

        hw.set_valve(ValvePosition::Closed);
        self.position = ValvePosition::Closed;
        sink.emit(&AppEvent::ValveMoved(ValvePosition::Closed));

        presenter.restore_ph_label(hw);

        self.feeds = self.feeds.wrapping_add(1);
        info!("Feed #{} done ({:?})", self.feeds, event.source);
    }

    pub fn position(&self) -> ValvePosition {
        self.position
    }

    /// Feed sequences completed since boot.
    pub fn feeds(&self) -> u32 {
        self.feeds
    }
}
