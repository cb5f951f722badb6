//! Watch face host backed by the PineTime system services

use chrono::FixedOffset;
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::Instant;
use watchface::{Host, TimeManager, WatchFaceStyle};

/// Redraw request channel between the engine and the display task
pub type RedrawSignal = Signal<ThreadModeRawMutex, ()>;

pub struct PineTimeHost {
    /// Wall clock derived from the RTC uptime
    time: TimeManager,
    /// UTC offset; fixed until a time source can report zones
    time_zone: FixedOffset,
    redraw: &'static RedrawSignal,
}

impl PineTimeHost {
    pub fn new(time: TimeManager, time_zone: FixedOffset, redraw: &'static RedrawSignal) -> Self {
        Self {
            time,
            time_zone,
            redraw,
        }
    }
}

impl Host for PineTimeHost {
    fn invalidate(&mut self) {
        self.redraw.signal(());
    }

    fn current_time_millis(&self) -> i64 {
        self.time.now_millis(Instant::now().as_millis())
    }

    fn default_time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    fn set_watch_face_style(&mut self, style: WatchFaceStyle) {
        // There is no system UI overlaying the face on the PineTime
        defmt::info!("Watch face style: {}", style);
    }

    fn register_time_zone_listener(&mut self) {
        defmt::debug!("Time zone listener registered");
    }

    fn unregister_time_zone_listener(&mut self) {
        defmt::debug!("Time zone listener unregistered");
    }
}
