//! UI definitions module
//!
//! A watch face turns a [`FaceState`] into a [`Frame`] of draw commands.
//! Rendering is a pure function of the state; rasterising the frame onto a
//! display happens separately in [`command`].

use chrono::NaiveDateTime;
use embedded_graphics::geometry::Size;

use crate::engine::DeviceCapabilities;

pub mod analog_watchface;
pub mod command;
pub mod hands;
pub mod palette;

pub use command::{DrawCommand, Frame};
pub use palette::{PaintStyle, Palette, StrokeCap};

/// Display state toggled by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    #[default]
    Interactive,
    /// Low-power display state
    Ambient,
}

impl DisplayMode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient {
            Self::Ambient
        } else {
            Self::Interactive
        }
    }

    pub fn is_ambient(self) -> bool {
        self == Self::Ambient
    }
}

/// State for the watch face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceState {
    /// Local wall-clock time
    pub time: NaiveDateTime,
    /// Full surface size; insets are not subtracted
    pub bounds: Size,
    pub mode: DisplayMode,
    pub capabilities: DeviceCapabilities,
}

impl FaceState {
    /// Paint styles for the current mode and capabilities
    pub fn palette(&self) -> Palette {
        Palette::select(self.mode, self.capabilities.low_bit_ambient)
    }
}

pub trait WatchFace {
    /// Build the draw commands for one frame
    fn render(&self, state: &FaceState) -> Result<Frame, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// More draw commands than a frame can hold
    FrameOverflow,
}
