//! Analog watchface
//!
//! Layered bezel, date box near three o'clock, three hands with short tails
//! and four ticks at the cardinal positions. Proportions are fractions of the
//! surface so the face scales with the panel.

use chrono::{Datelike, NaiveTime};

use super::{
    hands::{endpoint, tail, HandAngles, PointF},
    DrawCommand, Error, FaceState, Frame, PaintStyle, Palette, WatchFace,
};
use crate::config::FaceConfig;

/// Basic analog watchface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalogWatchface {
    config: FaceConfig,
}

impl AnalogWatchface {
    pub fn new(config: FaceConfig) -> Self {
        Self { config }
    }
}

impl WatchFace for AnalogWatchface {
    fn render(&self, state: &FaceState) -> Result<Frame, Error> {
        let palette = state.palette();
        let layout = Layout::new(state);
        let mut frame = Frame::new();

        layout.background(&mut frame, &palette, state)?;
        layout.date(&mut frame, &palette, state.time.day())?;
        layout.hands(
            &mut frame,
            &palette,
            &self.config,
            state.time.time(),
            !state.mode.is_ambient(),
        )?;
        layout.ticks(&mut frame, &palette)?;

        Ok(frame)
    }
}

/// Surface dimensions. The center ignores window insets so that faces with
/// a chin stay centered on the whole screen.
struct Layout {
    width: f32,
    height: f32,
    center: PointF,
}

impl Layout {
    fn new(state: &FaceState) -> Self {
        let width = state.bounds.width as f32;
        let height = state.bounds.height as f32;
        Self {
            width,
            height,
            center: PointF::new(width / 2.0, height / 2.0),
        }
    }

    fn rect(&self, from: f32, to: f32, style: PaintStyle) -> DrawCommand {
        self.rect_xy((from, to), (from, to), style)
    }

    fn rect_xy(&self, x: (f32, f32), y: (f32, f32), style: PaintStyle) -> DrawCommand {
        DrawCommand::Rect {
            left: self.width * x.0,
            top: self.height * y.0,
            right: self.width * x.1,
            bottom: self.height * y.1,
            style,
        }
    }

    fn background(&self, frame: &mut Frame, palette: &Palette, state: &FaceState) -> Result<(), Error> {
        let capabilities = &state.capabilities;

        if capabilities.is_round {
            let half = self.width / 2.0;
            for (radius, style) in [
                (self.width, palette.background),
                (half * 0.94, palette.background1),
                (half * 0.86, palette.background2),
            ] {
                frame.push(DrawCommand::Circle {
                    center: self.center,
                    radius,
                    style,
                })?;
            }

            if capabilities.chin_height > 0 {
                let chin_top = self.height - capabilities.chin_height as f32;
                frame.push(DrawCommand::Line {
                    from: PointF::new(0.0, chin_top - 5.0),
                    to: PointF::new(self.width, chin_top - 5.0),
                    style: palette.background,
                })?;
                frame.push(DrawCommand::Line {
                    from: PointF::new(self.width * 0.25, chin_top - 15.0),
                    to: PointF::new(self.width * 0.75, chin_top - 15.0),
                    style: palette.background1,
                })?;
            }
        } else {
            frame.push(self.rect(0.0, 1.0, palette.background))?;
            frame.push(self.rect(0.02, 0.98, palette.background1))?;
            frame.push(self.rect(0.07, 0.93, palette.background2))?;
        }

        Ok(())
    }

    fn date(&self, frame: &mut Frame, palette: &Palette, day: u32) -> Result<(), Error> {
        // Border, then the inner fill 1% inside it
        frame.push(self.rect_xy((0.695, 0.80), (0.456, 0.545), palette.date_box))?;
        frame.push(self.rect_xy((0.705, 0.79), (0.465, 0.535), palette.background1))?;
        frame.push(DrawCommand::Day {
            center: PointF::new(self.width * 0.7475, self.height * 0.5005),
            day,
            style: palette.date_text,
        })
    }

    fn hands(
        &self,
        frame: &mut Frame,
        palette: &Palette,
        config: &FaceConfig,
        time: NaiveTime,
        interactive: bool,
    ) -> Result<(), Error> {
        let angles = HandAngles::at(time);
        let half = self.center.x;

        // Only draw the second hand in interactive mode
        if interactive {
            self.hand(
                frame,
                angles.second,
                half - config.second_hand_inset,
                config.hand_tail,
                palette.second,
            )?;
        }
        self.hand(
            frame,
            angles.minute,
            half - config.minute_hand_inset,
            config.hand_tail,
            palette.minute,
        )?;
        self.hand(
            frame,
            angles.hour,
            half - config.hour_hand_inset,
            config.hand_tail,
            palette.hour,
        )
    }

    fn hand(
        &self,
        frame: &mut Frame,
        angle: f32,
        length: f32,
        tail_length: f32,
        style: PaintStyle,
    ) -> Result<(), Error> {
        frame.push(DrawCommand::Line {
            from: self.center,
            to: endpoint(self.center, angle, length),
            style,
        })?;
        frame.push(DrawCommand::Line {
            from: self.center,
            to: tail(self.center, angle, tail_length),
            style,
        })
    }

    fn ticks(&self, frame: &mut Frame, palette: &Palette) -> Result<(), Error> {
        let (w, h) = (self.width, self.height);
        let PointF { x: cx, y: cy } = self.center;

        for (from, to) in [
            (PointF::new(w * 0.96, cy), PointF::new(w, cy)),
            (PointF::new(w * 0.04, cy), PointF::new(0.0, cy)),
            (PointF::new(cx, 0.0), PointF::new(cx, h * 0.04)),
            (PointF::new(cx, h * 0.96), PointF::new(cx, h)),
        ] {
            frame.push(DrawCommand::Line {
                from,
                to,
                style: palette.tick,
            })?;
        }
        Ok(())
    }
}
