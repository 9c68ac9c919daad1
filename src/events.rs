//! Interrupt-to-loop hand-off for manual feed requests.
//!
//! The feed button ISR is the only producer; the main loop is the only
//! consumer. Only "pending or not" matters, so the hand-off is a single
//! atomic flag rather than a queue.
//!
//! ```text
//! ┌─────────────┐  trigger()  ┌──────────────────┐  take()  ┌───────────┐
//! │ Button ISR  │────────────▶│ ManualFeedLatch  │─────────▶│ Main loop │
//! │ (falling)   │             │ pending + stamp  │          │ (arbiter) │
//! └─────────────┘             └──────────────────┘          └───────────┘
//! ```
//!
//! The debounce timestamp is read and written only inside `trigger()`, so
//! the ISR's critical section is one compare and two stores.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::ControllerConfig;

/// Debounced, latched manual feed request.
pub struct ManualFeedLatch {
    debounce_ms: u32,
    pending: AtomicBool,
    /// Set once the first trigger has been accepted; until then there is
    /// no previous press to debounce against.
    armed: AtomicBool,
    last_accepted_ms: AtomicU32,
}

impl ManualFeedLatch {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            pending: AtomicBool::new(false),
            armed: AtomicBool::new(false),
            last_accepted_ms: AtomicU32::new(0),
        }
    }

    /// Record a button edge at `now_ms`.
    ///
    /// Safe to call from interrupt context (lock-free, no blocking).
    /// Returns `true` if the edge was accepted, `false` if it fell inside
    /// the debounce window of the previous accepted edge.
    pub fn trigger(&self, now_ms: u32) -> bool {
        if self.armed.load(Ordering::Relaxed) {
            let last = self.last_accepted_ms.load(Ordering::Relaxed);
            if now_ms.wrapping_sub(last) < self.debounce_ms {
                return false;
            }
        }
        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.armed.store(true, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Whether a request is waiting, without consuming it.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consume the pending request. Main loop only.
    ///
    /// A press that lands after this call stays latched for the next
    /// iteration.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// The process-wide latch the button ISR writes into.
pub static MANUAL_FEED: ManualFeedLatch =
    ManualFeedLatch::new(ControllerConfig::DEFAULT.debounce_ms);

/// ISR entry point. Register this on the feed button's falling edge.
pub fn manual_feed_isr_handler(now_ms: u32) {
    MANUAL_FEED.trigger(now_ms);
}
