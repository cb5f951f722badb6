//! Rasterise whole frames into an in-memory panel and inspect pixels.

use std::convert::Infallible;

use chrono::FixedOffset;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{Rgb565, Rgb888, RgbColor},
    Pixel,
};
use watchface::{
    ui::palette::{NAVY, RUST, SLATE, STEEL},
    AnalogWatchface, Engine, FaceConfig, Host, Properties, WatchFaceStyle, WindowInsets,
};

// 2024-03-07T03:00:00.000Z
const THREE_O_CLOCK_MS: i64 = 1_709_780_400_000;

const BOUNDS: Size = Size::new(200, 200);

struct Framebuffer<C> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: RgbColor> Framebuffer<C> {
    fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![C::WHITE; (size.width * size.height) as usize],
        }
    }

    fn pixel(&self, x: u32, y: u32) -> C {
        self.pixels[(y * self.size.width + x) as usize]
    }
}

impl<C> OriginDimensions for Framebuffer<C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: RgbColor> DrawTarget for Framebuffer<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if (0..self.size.width as i32).contains(&x) && (0..self.size.height as i32).contains(&y)
            {
                self.pixels[(y as u32 * self.size.width + x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}

struct FixedHost {
    now_ms: i64,
}

impl Host for FixedHost {
    fn invalidate(&mut self) {}

    fn current_time_millis(&self) -> i64 {
        self.now_ms
    }

    fn default_time_zone(&self) -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn set_watch_face_style(&mut self, _style: WatchFaceStyle) {}

    fn register_time_zone_listener(&mut self) {}

    fn unregister_time_zone_listener(&mut self) {}
}

fn engine(round: bool) -> Engine<FixedHost, AnalogWatchface> {
    let host = FixedHost {
        now_ms: THREE_O_CLOCK_MS,
    };
    let mut engine = Engine::new(host, AnalogWatchface::default(), &FaceConfig::default());
    engine.on_create();
    engine.on_apply_window_insets(WindowInsets {
        is_round: round,
        system_window_inset_bottom: 0,
    });
    engine.on_visibility_changed(true);
    engine
}

#[test]
fn round_face_at_three_o_clock() {
    let mut engine = engine(true);
    let mut panel = Framebuffer::<Rgb888>::new(BOUNDS);
    engine.draw(&mut panel, BOUNDS).unwrap();

    // Outer bezel reaches into the corners
    assert_eq!(panel.pixel(10, 10), STEEL);
    // Dial
    assert_eq!(panel.pixel(60, 140), NAVY);
    // Hour hand points right of center
    assert_eq!(panel.pixel(110, 100), STEEL);
    // Second hand points up, beyond the minute hand tip
    assert_eq!(panel.pixel(100, 30), RUST);
    // Date box border and fill
    assert_eq!(panel.pixel(140, 100), STEEL);
    assert_eq!(panel.pixel(141, 93), SLATE);
    // Tick at three o'clock
    assert_eq!(panel.pixel(199, 100), STEEL);
}

#[test]
fn square_face_uses_rectangular_bezel() {
    let mut engine = engine(false);
    let mut panel = Framebuffer::<Rgb888>::new(BOUNDS);
    engine.draw(&mut panel, BOUNDS).unwrap();

    assert_eq!(panel.pixel(1, 1), STEEL);
    assert_eq!(panel.pixel(10, 10), SLATE);
    assert_eq!(panel.pixel(20, 20), NAVY);
}

#[test]
fn low_bit_ambient_face_is_black() {
    let mut engine = engine(true);
    engine.on_properties_changed(Properties {
        low_bit_ambient: true,
        burn_in_protection: false,
    });
    engine.on_ambient_mode_changed(true);

    let mut panel = Framebuffer::<Rgb888>::new(BOUNDS);
    engine.draw(&mut panel, BOUNDS).unwrap();

    assert!(panel.pixels.iter().all(|pixel| *pixel == Rgb888::BLACK));
    assert_ne!(panel.pixel(100, 30), RUST);
}

#[test]
fn draws_onto_rgb565_panels() {
    let mut engine = engine(false);
    let mut panel = Framebuffer::<Rgb565>::new(Size::new(240, 240));
    engine.draw(&mut panel, Size::new(240, 240)).unwrap();

    assert_eq!(panel.pixel(1, 1), Rgb565::from(STEEL));
    assert_eq!(panel.pixel(120, 33), Rgb565::from(RUST));
}
