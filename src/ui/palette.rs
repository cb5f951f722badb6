//! Paint styles
//!
//! The palette is never mutated: each frame selects it from the display mode
//! and the low-bit ambient capability.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use super::DisplayMode;

/// Steel grey used for hands, ticks, date and outer bezel
pub const STEEL: Rgb888 = Rgb888::new(166, 171, 165);
/// Second hand
pub const RUST: Rgb888 = Rgb888::new(176, 89, 73);
/// Middle bezel ring and date box fill
pub const SLATE: Rgb888 = Rgb888::new(35, 39, 42);
/// Dial
pub const NAVY: Rgb888 = Rgb888::new(38, 45, 53);

/// Shape of line ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StrokeCap {
    /// Ends exactly at the endpoints
    Butt,
    /// Extends past each endpoint by half the stroke width
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaintStyle {
    pub color: Rgb888,
    /// Stroke width (px)
    pub stroke_width: u32,
    pub anti_alias: bool,
    pub cap: StrokeCap,
}

impl PaintStyle {
    const fn line(color: Rgb888, stroke_width: u32) -> Self {
        Self {
            color,
            stroke_width,
            anti_alias: true,
            cap: StrokeCap::Square,
        }
    }

    const fn fill(color: Rgb888, stroke_width: u32) -> Self {
        Self {
            color,
            stroke_width,
            anti_alias: true,
            cap: StrokeCap::Butt,
        }
    }

    fn blacked_out(self) -> Self {
        Self {
            color: Rgb888::BLACK,
            ..self
        }
    }

    fn aliased(self) -> Self {
        Self {
            anti_alias: false,
            ..self
        }
    }
}

/// The nine paint styles of the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    pub hour: PaintStyle,
    pub minute: PaintStyle,
    pub second: PaintStyle,
    pub tick: PaintStyle,
    pub date_box: PaintStyle,
    pub date_text: PaintStyle,
    /// Outer bezel ring
    pub background: PaintStyle,
    /// Middle bezel ring
    pub background1: PaintStyle,
    /// Dial
    pub background2: PaintStyle,
}

impl Palette {
    pub const INTERACTIVE: Self = Self {
        hour: PaintStyle::line(STEEL, 7),
        minute: PaintStyle::line(STEEL, 7),
        second: PaintStyle::line(RUST, 4),
        tick: PaintStyle::line(STEEL, 7),
        date_box: PaintStyle::fill(STEEL, 1),
        date_text: PaintStyle::fill(STEEL, 1),
        background: PaintStyle::fill(STEEL, 10),
        background1: PaintStyle::fill(SLATE, 10),
        background2: PaintStyle::fill(NAVY, 1),
    };

    /// Select the palette for a display mode.
    ///
    /// Ambient mode collapses every color to black. On low-bit ambient
    /// displays the four line styles also drop anti-aliasing.
    pub fn select(mode: DisplayMode, low_bit_ambient: bool) -> Self {
        match mode {
            DisplayMode::Interactive => Self::INTERACTIVE,
            DisplayMode::Ambient => {
                let palette = Self::INTERACTIVE.map(PaintStyle::blacked_out);
                if low_bit_ambient {
                    palette.map_lines(PaintStyle::aliased)
                } else {
                    palette
                }
            }
        }
    }

    /// All nine styles, hands first
    pub fn styles(&self) -> [PaintStyle; 9] {
        [
            self.hour,
            self.minute,
            self.second,
            self.tick,
            self.date_box,
            self.date_text,
            self.background,
            self.background1,
            self.background2,
        ]
    }

    /// The styles used for stroked lines: hands and ticks
    pub fn line_styles(&self) -> [PaintStyle; 4] {
        [self.hour, self.minute, self.second, self.tick]
    }

    fn map(self, f: impl Fn(PaintStyle) -> PaintStyle) -> Self {
        Self {
            date_box: f(self.date_box),
            date_text: f(self.date_text),
            background: f(self.background),
            background1: f(self.background1),
            background2: f(self.background2),
            ..self.map_lines(&f)
        }
    }

    fn map_lines(self, f: impl Fn(PaintStyle) -> PaintStyle) -> Self {
        Self {
            hour: f(self.hour),
            minute: f(self.minute),
            second: f(self.second),
            tick: f(self.tick),
            ..self
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}
