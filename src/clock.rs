//! Time keeping for the watch face

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, NaiveTime, TimeZone};

/// Wall-clock time paired with the uptime it was observed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReference {
    /// Clock time (UTC, ms since the Unix epoch)
    epoch_ms: i64,
    /// Related system uptime (ms since boot)
    uptime_ms: u64,
}

impl TimeReference {
    /// Create new time reference from a UTC timestamp seen at `uptime_ms`
    pub fn new(epoch_ms: i64, uptime_ms: u64) -> Self {
        Self {
            epoch_ms,
            uptime_ms,
        }
    }
}

/// Maps the monotonic system uptime onto wall-clock time.
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Current UTC time in ms since the epoch, given the current uptime
    pub fn now_millis(&self, uptime_ms: u64) -> i64 {
        let elapsed = uptime_ms.saturating_sub(self.reference.uptime_ms);
        let elapsed = i64::try_from(elapsed).unwrap_or(i64::MAX);
        self.reference.epoch_ms.saturating_add(elapsed)
    }
}

/// Current wall-clock time of the face, in a fixed UTC offset.
///
/// The local time and the day of month are derived from the stored offset
/// on every read, so a time zone change shows up on the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    utc: NaiveDateTime,
    offset: FixedOffset,
}

impl Clock {
    pub fn new(epoch_ms: i64, offset: FixedOffset) -> Self {
        let mut clock = Self {
            utc: NaiveDateTime::default(),
            offset,
        };
        clock.set_time_in_millis(epoch_ms);
        clock
    }

    /// Resample the clock. Timestamps outside chrono's range keep the
    /// previous time.
    pub fn set_time_in_millis(&mut self, epoch_ms: i64) {
        match DateTime::from_timestamp_millis(epoch_ms) {
            Some(time) => self.utc = time.naive_utc(),
            None => warn!("Timestamp out of range: {}", epoch_ms),
        }
    }

    pub fn set_time_zone(&mut self, offset: FixedOffset) {
        if offset != self.offset {
            debug!(
                "Time zone changed to UTC offset {=i32} s",
                offset.local_minus_utc()
            );
        }
        self.offset = offset;
    }

    pub fn time_zone(&self) -> FixedOffset {
        self.offset
    }

    /// UTC time in ms since the epoch
    pub fn time_in_millis(&self) -> i64 {
        self.utc.and_utc().timestamp_millis()
    }

    /// Local date and time
    pub fn local(&self) -> NaiveDateTime {
        self.offset.from_utc_datetime(&self.utc).naive_local()
    }

    /// Local time of day
    pub fn time_of_day(&self) -> NaiveTime {
        self.local().time()
    }

    pub fn day_of_month(&self) -> u32 {
        self.local().day()
    }
}
