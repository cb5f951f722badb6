//! Watch face configuration

/// Update rate in milliseconds for interactive mode. The face redraws once a
/// second to advance the second hand.
pub const INTERACTIVE_UPDATE_RATE_MS: u32 = 1_000;

/// Geometry and timing of the analog face.
///
/// Hand lengths are given as insets from half the face width, so the same
/// configuration scales with the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    /// Interval between interactive redraws (ms)
    pub update_rate_ms: u32,
    /// Second hand length = center x - inset (px)
    pub second_hand_inset: f32,
    /// Minute hand length = center x - inset (px)
    pub minute_hand_inset: f32,
    /// Hour hand length = center x - inset (px)
    pub hour_hand_inset: f32,
    /// Length of the tail extending opposite each hand (px)
    pub hand_tail: f32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            update_rate_ms: INTERACTIVE_UPDATE_RATE_MS,
            second_hand_inset: 20.0,
            minute_hand_inset: 40.0,
            hour_hand_inset: 80.0,
            hand_tail: 15.0,
        }
    }
}
