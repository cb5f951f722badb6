//! Interactive update timer
//!
//! The timer is a single pending deadline in wall-clock milliseconds. The
//! host sleeps until [`UpdateTimer::next_wake`] and then lets the engine poll
//! it, so no real time has to pass to exercise the scheduling rules.

/// Periodic redraw signal aligned to wall-clock second boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpdateTimer {
    /// Interval between fires (ms)
    rate_ms: u32,
    /// Deadline of the pending fire (UTC ms), if any
    pending: Option<i64>,
}

impl UpdateTimer {
    pub fn new(rate_ms: u32) -> Self {
        Self {
            rate_ms: rate_ms.max(1),
            pending: None,
        }
    }

    /// Drop any pending fire.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!("Update timer cancelled");
        }
    }

    /// Schedule a fire right away, replacing any pending one.
    pub fn schedule_now(&mut self, now_ms: i64) {
        self.pending = Some(now_ms);
    }

    /// Schedule the next fire on the next multiple of the update rate.
    pub fn schedule_aligned(&mut self, now_ms: i64) {
        self.pending = Some(now_ms + self.delay_ms(now_ms));
    }

    /// Time until the next rate boundary, in `1..=rate` ms.
    pub fn delay_ms(&self, now_ms: i64) -> i64 {
        let rate = i64::from(self.rate_ms);
        rate - now_ms.rem_euclid(rate)
    }

    /// Deadline of the pending fire
    pub fn next_wake(&self) -> Option<i64> {
        self.pending
    }

    /// Consume the pending fire if its deadline has passed.
    pub fn take_due(&mut self, now_ms: i64) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now_ms => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
