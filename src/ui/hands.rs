//! Hand angles
//!
//! Angles are in radians, 0 at twelve o'clock and growing clockwise. Every
//! hand moves continuously: the fractional part of the smaller units is
//! carried into the larger ones.

use core::f32::consts::TAU;

use chrono::{NaiveTime, Timelike};

/// Screen-space point with sub-pixel precision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rotation of the three hands for one instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn at(time: NaiveTime) -> Self {
        // Leap seconds report nanoseconds past one second
        let millis = (time.nanosecond() / 1_000_000).min(999);

        let seconds = time.second() as f32 + millis as f32 / 1000.0;
        let minutes = time.minute() as f32 + seconds / 60.0;
        let hours = (time.hour() % 12) as f32 + minutes / 60.0;

        Self {
            hour: revolution(hours / 12.0),
            minute: revolution(minutes / 60.0),
            second: revolution(seconds / 60.0),
        }
    }
}

/// Fraction of a turn to radians, kept below a full turn.
///
/// Rounding can push the last millisecond before a wrap onto 2π exactly; the
/// result is clamped to the closest representable angle below it.
fn revolution(fraction: f32) -> f32 {
    let angle = fraction * TAU;
    if angle < TAU {
        angle
    } else {
        f32::from_bits(TAU.to_bits() - 1)
    }
}

/// Point `length` px from `center` along `angle`.
pub fn endpoint(center: PointF, angle: f32, length: f32) -> PointF {
    PointF::new(
        center.x + libm::sinf(angle) * length,
        center.y - libm::cosf(angle) * length,
    )
}

/// Point `length` px from `center` opposite to `angle`.
pub fn tail(center: PointF, angle: f32, length: f32) -> PointF {
    endpoint(center, angle, -length)
}
