//! Watch face engine
//!
//! The engine owns the face state and reacts to lifecycle callbacks from the
//! host. It never draws on its own: it asks the host to [`Host::invalidate`]
//! and the host answers with a call to [`Engine::draw`].
//!
//! While the face is visible and interactive, a one-second update timer keeps
//! the second hand moving. The timer is a deadline the host sleeps on
//! ([`Engine::next_wake`]) before calling [`Engine::poll_timer`].

use chrono::FixedOffset;
use embedded_graphics::{draw_target::DrawTarget, geometry::Size, pixelcolor::Rgb888};

use crate::{
    clock::Clock,
    config::FaceConfig,
    timer::UpdateTimer,
    ui::{self, DisplayMode, FaceState, WatchFace},
};

/// How far notification cards peek over the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeekMode {
    Short,
    Variable,
}

/// When cards get an opaque background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackgroundVisibility {
    Interruptive,
    Persistent,
}

/// System UI options published to the host on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchFaceStyle {
    pub peek_mode: PeekMode,
    pub background_visibility: BackgroundVisibility,
    /// Whether the host overlays its own digital time
    pub show_system_ui_time: bool,
}

impl Default for WatchFaceStyle {
    fn default() -> Self {
        Self {
            peek_mode: PeekMode::Short,
            background_visibility: BackgroundVisibility::Interruptive,
            show_system_ui_time: false,
        }
    }
}

/// Device properties reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Properties {
    pub low_bit_ambient: bool,
    pub burn_in_protection: bool,
}

/// Window insets reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowInsets {
    pub is_round: bool,
    /// Height of the bottom cutout (px)
    pub system_window_inset_bottom: u32,
}

/// Capabilities of the display the face runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceCapabilities {
    /// Ambient mode supports fewer color bits
    pub low_bit_ambient: bool,
    /// Static elements should move to avoid burn-in (not used for drawing)
    pub burn_in_protection: bool,
    pub is_round: bool,
    /// Height of the bottom cutout of round displays (px)
    pub chin_height: u32,
}

/// Services the watch face needs from the platform
pub trait Host {
    /// Request a redraw. Requests are coalesced into the next draw.
    fn invalidate(&mut self);

    /// Current UTC time in ms since the epoch
    fn current_time_millis(&self) -> i64;

    /// System time zone
    fn default_time_zone(&self) -> FixedOffset;

    fn set_watch_face_style(&mut self, style: WatchFaceStyle);

    /// Start delivering time zone change notifications to
    /// [`Engine::on_time_zone_changed`].
    fn register_time_zone_listener(&mut self);

    fn unregister_time_zone_listener(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawError<E> {
    Frame(ui::Error),
    Target(E),
}

impl<E> From<ui::Error> for DrawError<E> {
    fn from(error: ui::Error) -> Self {
        Self::Frame(error)
    }
}

/// Lifecycle and timer controller of one watch face
pub struct Engine<H: Host, F: WatchFace> {
    host: H,
    face: F,
    clock: Clock,
    capabilities: DeviceCapabilities,
    mode: DisplayMode,
    visible: bool,
    timer: UpdateTimer,
    time_zone_listener: bool,
}

impl<H: Host, F: WatchFace> Engine<H, F> {
    pub fn new(host: H, face: F, config: &FaceConfig) -> Self {
        let clock = Clock::new(host.current_time_millis(), host.default_time_zone());
        Self {
            host,
            face,
            clock,
            capabilities: DeviceCapabilities::default(),
            mode: DisplayMode::Interactive,
            visible: false,
            timer: UpdateTimer::new(config.update_rate_ms),
            time_zone_listener: false,
        }
    }

    /// Configure the system UI and start from the current time.
    pub fn on_create(&mut self) {
        info!("Creating watch face");
        self.host.set_watch_face_style(WatchFaceStyle::default());
        self.clock = Clock::new(
            self.host.current_time_millis(),
            self.host.default_time_zone(),
        );
    }

    pub fn on_properties_changed(&mut self, properties: Properties) {
        debug!(
            "Properties: low bit ambient {}, burn-in protection {}",
            properties.low_bit_ambient,
            properties.burn_in_protection
        );
        self.capabilities.low_bit_ambient = properties.low_bit_ambient;
        self.capabilities.burn_in_protection = properties.burn_in_protection;
    }

    pub fn on_apply_window_insets(&mut self, insets: WindowInsets) {
        debug!(
            "Insets: round {}, chin {} px",
            insets.is_round,
            insets.system_window_inset_bottom
        );
        self.capabilities.is_round = insets.is_round;
        self.capabilities.chin_height = insets.system_window_inset_bottom;
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        self.mode = DisplayMode::from_ambient(ambient);
        debug!("Display mode: {}", self.mode);
        self.host.invalidate();
        self.update_timer();
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.register_time_zone_listener();
            // The zone may have changed while the face was hidden
            self.clock.set_time_zone(self.host.default_time_zone());
        } else {
            self.unregister_time_zone_listener();
        }
        self.update_timer();
    }

    /// Periodic tick from the host, roughly once a minute.
    pub fn on_time_tick(&mut self) {
        self.host.invalidate();
    }

    pub fn on_time_zone_changed(&mut self) {
        self.clock.set_time_zone(self.host.default_time_zone());
        self.host.invalidate();
    }

    /// Fire the update timer if its deadline has passed. Returns whether it
    /// fired.
    pub fn poll_timer(&mut self) -> bool {
        let now = self.host.current_time_millis();
        if !self.timer.take_due(now) {
            return false;
        }

        trace!("Update timer fired");
        self.host.invalidate();
        if self.should_timer_be_running() {
            self.timer.schedule_aligned(now);
        }
        true
    }

    /// Deadline of the pending timer fire (UTC ms)
    pub fn next_wake(&self) -> Option<i64> {
        self.timer.next_wake()
    }

    /// Resample the clock and paint one frame onto `target`.
    pub fn draw<D>(&mut self, target: &mut D, bounds: Size) -> Result<(), DrawError<D::Error>>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        self.clock.set_time_in_millis(self.host.current_time_millis());
        let frame = self.face.render(&self.face_state(bounds))?;
        frame.draw(target).map_err(DrawError::Target)
    }

    /// Snapshot of everything a frame depends on
    pub fn face_state(&self, bounds: Size) -> FaceState {
        FaceState {
            time: self.clock.local(),
            bounds,
            mode: self.mode,
            capabilities: self.capabilities,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_in_ambient_mode(&self) -> bool {
        self.mode.is_ambient()
    }

    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The timer only runs while the face is visible and interactive.
    fn should_timer_be_running(&self) -> bool {
        self.visible && !self.mode.is_ambient()
    }

    fn update_timer(&mut self) {
        self.timer.cancel();
        if self.should_timer_be_running() {
            self.timer.schedule_now(self.host.current_time_millis());
        }
    }

    fn register_time_zone_listener(&mut self) {
        if self.time_zone_listener {
            return;
        }
        self.time_zone_listener = true;
        self.host.register_time_zone_listener();
    }

    fn unregister_time_zone_listener(&mut self) {
        if !self.time_zone_listener {
            return;
        }
        self.time_zone_listener = false;
        self.host.unregister_time_zone_listener();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{analog_watchface::AnalogWatchface, Palette};
    use proptest::prelude::*;

    // 2024-03-17T02:59:59.400Z
    const START_MS: i64 = 1_710_644_399_400;

    #[derive(Default)]
    struct MockHost {
        now_ms: i64,
        offset_secs: i32,
        invalidations: usize,
        style: Option<WatchFaceStyle>,
        listener: bool,
        registrations: usize,
    }

    impl Host for MockHost {
        fn invalidate(&mut self) {
            self.invalidations += 1;
        }

        fn current_time_millis(&self) -> i64 {
            self.now_ms
        }

        fn default_time_zone(&self) -> FixedOffset {
            FixedOffset::east_opt(self.offset_secs).unwrap()
        }

        fn set_watch_face_style(&mut self, style: WatchFaceStyle) {
            self.style = Some(style);
        }

        fn register_time_zone_listener(&mut self) {
            assert!(!self.listener, "listener registered twice");
            self.listener = true;
            self.registrations += 1;
        }

        fn unregister_time_zone_listener(&mut self) {
            assert!(self.listener, "listener not registered");
            self.listener = false;
        }
    }

    fn engine() -> Engine<MockHost, AnalogWatchface> {
        let host = MockHost {
            now_ms: START_MS,
            ..Default::default()
        };
        let mut engine = Engine::new(host, AnalogWatchface::default(), &FaceConfig::default());
        engine.on_create();
        engine
    }

    #[test]
    fn test_create_publishes_style() {
        let engine = engine();
        let style = engine.host().style.unwrap();

        assert_eq!(style.peek_mode, PeekMode::Short);
        assert_eq!(
            style.background_visibility,
            BackgroundVisibility::Interruptive
        );
        assert!(!style.show_system_ui_time);
        assert_eq!(engine.clock().time_in_millis(), START_MS);
        assert_eq!(engine.next_wake(), None);
    }

    #[test]
    fn test_capabilities_from_callbacks() {
        let mut engine = engine();
        engine.on_properties_changed(Properties {
            low_bit_ambient: true,
            burn_in_protection: true,
        });
        engine.on_apply_window_insets(WindowInsets {
            is_round: true,
            system_window_inset_bottom: 30,
        });
        // No redraw for property changes
        assert_eq!(engine.host().invalidations, 0);

        engine.on_apply_window_insets(WindowInsets {
            is_round: true,
            system_window_inset_bottom: 0,
        });
        assert_eq!(
            *engine.capabilities(),
            DeviceCapabilities {
                low_bit_ambient: true,
                burn_in_protection: true,
                is_round: true,
                chin_height: 0,
            }
        );
    }

    #[test]
    fn test_timer_ticks_on_second_boundaries() {
        let mut engine = engine();
        engine.on_visibility_changed(true);

        // Becoming visible schedules an immediate fire
        assert_eq!(engine.next_wake(), Some(START_MS));
        assert!(engine.poll_timer());
        assert_eq!(engine.host().invalidations, 1);
        assert_eq!(engine.next_wake(), Some(START_MS + 600));

        // Not due yet
        engine.host_mut().now_ms = START_MS + 599;
        assert!(!engine.poll_timer());

        // A late wake still realigns to the next boundary
        engine.host_mut().now_ms = START_MS + 630;
        assert!(engine.poll_timer());
        assert_eq!(engine.next_wake(), Some(START_MS + 1_600));
        assert_eq!(engine.host().invalidations, 2);
    }

    #[test]
    fn test_ambient_stops_timer() {
        let mut engine = engine();
        engine.on_visibility_changed(true);
        engine.on_ambient_mode_changed(true);

        assert!(engine.is_in_ambient_mode());
        assert_eq!(engine.next_wake(), None);
        assert!(!engine.poll_timer());
        assert_eq!(engine.host().invalidations, 1);

        engine.host_mut().now_ms += 250;
        engine.on_ambient_mode_changed(false);
        assert_eq!(engine.next_wake(), Some(START_MS + 250));
    }

    #[test]
    fn test_ambient_transition_is_idempotent() {
        let mut engine = engine();
        engine.on_properties_changed(Properties {
            low_bit_ambient: true,
            burn_in_protection: false,
        });
        let bounds = Size::new(200, 200);

        engine.on_ambient_mode_changed(true);
        let once = engine.face_state(bounds);
        engine.on_ambient_mode_changed(true);
        let twice = engine.face_state(bounds);

        assert_eq!(once, twice);
        assert_eq!(twice.palette(), Palette::select(DisplayMode::Ambient, true));
    }

    #[test]
    fn test_time_zone_listener_is_idempotent() {
        let mut engine = engine();

        engine.on_visibility_changed(true);
        engine.on_visibility_changed(true);
        assert!(engine.host().listener);
        assert_eq!(engine.host().registrations, 1);

        engine.on_visibility_changed(false);
        engine.on_visibility_changed(false);
        assert!(!engine.host().listener);
    }

    #[test]
    fn test_time_zone_refresh() {
        let mut engine = engine();
        engine.on_visibility_changed(true);

        engine.host_mut().offset_secs = 3_600;
        engine.on_time_zone_changed();
        assert_eq!(engine.clock().time_zone().local_minus_utc(), 3_600);
        assert_eq!(engine.host().invalidations, 1);

        // Changes while hidden are picked up on becoming visible
        engine.on_visibility_changed(false);
        engine.host_mut().offset_secs = -7_200;
        engine.on_visibility_changed(true);
        assert_eq!(engine.clock().time_zone().local_minus_utc(), -7_200);
    }

    #[test]
    fn test_time_tick_invalidates() {
        let mut engine = engine();
        engine.on_time_tick();
        engine.on_time_tick();
        assert_eq!(engine.host().invalidations, 2);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Visibility(bool),
        Ambient(bool),
        Advance(i64),
        TimeTick,
        Poll,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            any::<bool>().prop_map(Event::Visibility),
            any::<bool>().prop_map(Event::Ambient),
            (0i64..3_000).prop_map(Event::Advance),
            Just(Event::TimeTick),
            Just(Event::Poll),
        ]
    }

    proptest! {
        #[test]
        fn timer_pending_iff_interactive(events in proptest::collection::vec(event(), 0..64)) {
            let mut engine = engine();
            for event in events {
                match event {
                    Event::Visibility(visible) => engine.on_visibility_changed(visible),
                    Event::Ambient(ambient) => engine.on_ambient_mode_changed(ambient),
                    Event::Advance(ms) => engine.host_mut().now_ms += ms,
                    Event::TimeTick => engine.on_time_tick(),
                    Event::Poll => {
                        engine.poll_timer();
                    }
                }

                let interactive = engine.is_visible() && !engine.is_in_ambient_mode();
                prop_assert_eq!(engine.next_wake().is_some(), interactive);
                prop_assert_eq!(engine.host().listener, engine.is_visible());
            }
        }
    }
}
