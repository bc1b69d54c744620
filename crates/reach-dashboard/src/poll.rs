//! Background refresh scheduling.
//!
//! The dashboard re-fetches the email list every 30 seconds while it is
//! open. Instead of a detached interval, the timer is an explicit object
//! owned by the dashboard loop: created on entry, dropped on logout, and
//! driven from the event loop so refreshes stay sequential and can never
//! pile up behind a slow proxy.

use std::time::{Duration, Instant};

use reach_core::defaults;

/// Fixed-interval refresh timer.
#[derive(Debug)]
pub struct RefreshTimer {
    interval: Duration,
    last: Instant,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Timer at the documented 30-second cadence.
    pub fn default_cadence() -> Self {
        Self::new(Duration::from_secs(defaults::POLL_INTERVAL_SECS))
    }

    /// Has a full interval elapsed since the last refresh?
    pub fn due(&self) -> bool {
        self.last.elapsed() >= self.interval
    }

    /// Restart the interval (after a refresh, manual or scheduled).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Check-and-reset in one step; true means "refresh now".
    pub fn tick(&mut self) -> bool {
        if self.due() {
            self.reset();
            true
        } else {
            false
        }
    }
}

/// A single delayed refresh, scheduled after an account is added so the
/// backend has time for its first sync pass.
#[derive(Debug)]
pub struct DeferredRefresh {
    at: Instant,
}

impl DeferredRefresh {
    pub fn after(delay: Duration) -> Self {
        Self {
            at: Instant::now() + delay,
        }
    }

    pub fn due(&self) -> bool {
        Instant::now() >= self.at
    }
}
