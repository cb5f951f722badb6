//! Analog watch face engine.
//!
//! The engine reacts to host lifecycle callbacks (visibility, ambient mode,
//! window insets, time ticks) and renders an analog face onto any
//! `embedded-graphics` draw target. The PineTime firmware in `src/main.rs`
//! is one such host; tests drive the engine with a mock host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod engine;
pub mod timer;
pub mod ui;

pub use clock::{Clock, TimeManager, TimeReference};
pub use config::FaceConfig;
pub use engine::{
    BackgroundVisibility, DeviceCapabilities, DrawError, Engine, Host, PeekMode, Properties,
    WatchFaceStyle, WindowInsets,
};
pub use timer::UpdateTimer;
pub use ui::{analog_watchface::AnalogWatchface, DisplayMode, FaceState, WatchFace};
