//! Draw commands and their rasterisation
//!
//! Commands keep sub-pixel coordinates and are rounded only when drawn onto
//! an `embedded-graphics` target. Anti-aliasing is carried through the
//! styles but the rasteriser itself does not blend.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    pixelcolor::{PixelColor, Rgb888},
    primitives::{Circle, Line, Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};
use heapless::Vec;
use profont::PROFONT_12_POINT;

use super::{hands::PointF, Error, PaintStyle, StrokeCap};

/// Upper bound of commands in one frame: five background shapes, three for
/// the date, six hand segments and four ticks.
pub const MAX_COMMANDS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawCommand {
    /// Filled circle
    Circle {
        center: PointF,
        radius: f32,
        style: PaintStyle,
    },
    /// Filled rectangle spanning `[left, right) x [top, bottom)`
    Rect {
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        style: PaintStyle,
    },
    /// Stroked line segment
    Line {
        from: PointF,
        to: PointF,
        style: PaintStyle,
    },
    /// Day-of-month numeral centered on `center`
    Day {
        center: PointF,
        day: u32,
        style: PaintStyle,
    },
}

/// Ordered list of draw commands, painted back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    commands: Vec<DrawCommand, MAX_COMMANDS>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) -> Result<(), Error> {
        self.commands
            .push(command)
            .map_err(|_| Error::FrameOverflow)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Paint the frame onto `target`.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        for command in self.commands.iter() {
            command.draw(target)?;
        }
        Ok(())
    }
}

impl DrawCommand {
    pub fn style(&self) -> &PaintStyle {
        match self {
            Self::Circle { style, .. }
            | Self::Rect { style, .. }
            | Self::Line { style, .. }
            | Self::Day { style, .. } => style,
        }
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        match *self {
            Self::Circle {
                center,
                radius,
                style,
            } => {
                let diameter = libm::roundf(radius.max(0.0) * 2.0) as u32;
                Circle::with_center(to_point(center), diameter)
                    .into_styled(fill(&style))
                    .draw(target)
            }
            Self::Rect {
                left,
                top,
                right,
                bottom,
                style,
            } => {
                let top_left = to_point(PointF::new(left, top));
                let bottom_right = to_point(PointF::new(right, bottom));
                let size = Size::new(
                    (bottom_right.x - top_left.x).max(0) as u32,
                    (bottom_right.y - top_left.y).max(0) as u32,
                );
                Rectangle::new(top_left, size)
                    .into_styled(fill(&style))
                    .draw(target)
            }
            Self::Line { from, to, style } => {
                let (from, to) = match style.cap {
                    StrokeCap::Butt => (from, to),
                    StrokeCap::Square => square_cap(from, to, style.stroke_width as f32 / 2.0),
                };
                Line::new(to_point(from), to_point(to))
                    .into_styled(stroke(&style))
                    .draw(target)
            }
            Self::Day { center, day, style } => {
                let mut buf = [0u8; 4];
                let Ok(text) = format_no_std::show(&mut buf, format_args!("{}", day)) else {
                    warn!("Day {} does not fit the date box", day);
                    return Ok(());
                };
                let character_style =
                    MonoTextStyle::new(&PROFONT_12_POINT, D::Color::from(style.color));
                let text_style = TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Middle)
                    .build();
                Text::with_text_style(text, to_point(center), character_style, text_style)
                    .draw(target)
                    .map(|_| ())
            }
        }
    }
}

fn to_point(point: PointF) -> Point {
    Point::new(libm::roundf(point.x) as i32, libm::roundf(point.y) as i32)
}

fn fill<C: PixelColor + From<Rgb888>>(style: &PaintStyle) -> PrimitiveStyle<C> {
    PrimitiveStyle::with_fill(C::from(style.color))
}

fn stroke<C: PixelColor + From<Rgb888>>(style: &PaintStyle) -> PrimitiveStyle<C> {
    PrimitiveStyle::with_stroke(C::from(style.color), style.stroke_width.max(1))
}

/// Extend a segment by `extension` px past both endpoints.
fn square_cap(from: PointF, to: PointF, extension: f32) -> (PointF, PointF) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length = libm::sqrtf(dx * dx + dy * dy);
    if length == 0.0 {
        return (from, to);
    }
    let (ux, uy) = (dx / length * extension, dy / length * extension);
    (
        PointF::new(from.x - ux, from.y - uy),
        PointF::new(to.x + ux, to.y + uy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Palette;

    #[test]
    fn test_square_cap_extends_both_ends() {
        let (from, to) = square_cap(PointF::new(10.0, 10.0), PointF::new(10.0, 30.0), 2.0);
        assert_eq!(from, PointF::new(10.0, 8.0));
        assert_eq!(to, PointF::new(10.0, 32.0));
    }

    #[test]
    fn test_square_cap_degenerate_line() {
        let point = PointF::new(5.0, 5.0);
        assert_eq!(square_cap(point, point, 3.0), (point, point));
    }

    #[test]
    fn test_frame_overflow() {
        let mut frame = Frame::new();
        let command = DrawCommand::Line {
            from: PointF::new(0.0, 0.0),
            to: PointF::new(1.0, 1.0),
            style: Palette::INTERACTIVE.tick,
        };
        for _ in 0..MAX_COMMANDS {
            frame.push(command).unwrap();
        }
        assert_eq!(frame.push(command), Err(Error::FrameOverflow));
        assert_eq!(frame.len(), MAX_COMMANDS);
    }
}
