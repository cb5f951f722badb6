#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    spim,
};
use embassy_time::{Delay, Duration, Instant, Timer};

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, button::Button, display::Display};
use system::{
    config::SystemConfig,
    host::{PineTimeHost, RedrawSignal},
};

// Others
use chrono::FixedOffset;
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use watchface::{
    AnalogWatchface, Engine, FaceConfig, Host, Properties, TimeManager, TimeReference,
    WindowInsets,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
// UTC+1, in seconds east of UTC
const TIMEZONE: i32 = 3_600;

// The ST7789 keeps full color in ambient mode
const LOW_BIT_AMBIENT: bool = false;

// Inactivity before dimming to ambient, and before switching the face off
const AMBIENT_AFTER: Duration = Duration::from_secs(10);
const SLEEP_AFTER: Duration = Duration::from_secs(30);

const INTERACTIVE_BRIGHTNESS: u8 = 3;
const AMBIENT_BRIGHTNESS: u8 = 1;

// Interval of the host time tick
const TIME_TICK_MS: i64 = 60_000;

type Face = Engine<PineTimeHost, AnalogWatchface>;

// Communication channels
static BUTTON_PRESSED: Signal<ThreadModeRawMutex, ()> = Signal::new();
static REDRAW: RedrawSignal = Signal::new();

/// Polls the button state every 10ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut button: Button<'static>) {
    loop {
        if button.pressed().await {
            BUTTON_PRESSED.signal(());
        }

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

/// Drive the watch face: timer, time ticks, inactivity and redraws.
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(
    mut engine: Face,
    mut display: Display<'static, SPI2>,
    mut backlight: Backlight<'static>,
) {
    let mut last_activity = Instant::now();
    let mut last_minute = engine.host().current_time_millis().div_euclid(TIME_TICK_MS);

    loop {
        // Sleep until the next minute, timer fire or inactivity step,
        // whichever comes first
        let now_ms = engine.host().current_time_millis();
        let mut delay_ms = TIME_TICK_MS - now_ms.rem_euclid(TIME_TICK_MS);
        if let Some(wake) = engine.next_wake() {
            delay_ms = delay_ms.min(wake - now_ms);
        }
        if engine.is_visible() {
            let step = if engine.is_in_ambient_mode() {
                SLEEP_AFTER
            } else {
                AMBIENT_AFTER
            };
            let idle = last_activity.elapsed();
            delay_ms = delay_ms.min(step.as_millis() as i64 - idle.as_millis() as i64);
        }
        let delay = Duration::from_millis(delay_ms.max(0) as u64);

        if let Either::Second(_) = select(Timer::after(delay), BUTTON_PRESSED.wait()).await {
            defmt::debug!("Button pressed");
            last_activity = Instant::now();
            if !engine.is_visible() {
                engine.on_visibility_changed(true);
            }
            if engine.is_in_ambient_mode() {
                engine.on_ambient_mode_changed(false);
            }
            if backlight.get_brightness() != INTERACTIVE_BRIGHTNESS {
                if let Err(e) = backlight.set(INTERACTIVE_BRIGHTNESS) {
                    defmt::warn!("Backlight: {}", e);
                }
            }
        }

        let idle = last_activity.elapsed();
        if engine.is_visible() && idle >= SLEEP_AFTER {
            defmt::info!("Display off");
            engine.on_visibility_changed(false);
            backlight.off();
        } else if engine.is_visible() && idle >= AMBIENT_AFTER && !engine.is_in_ambient_mode() {
            defmt::info!("Entering ambient mode");
            engine.on_ambient_mode_changed(true);
            if let Err(e) = backlight.set(AMBIENT_BRIGHTNESS) {
                defmt::warn!("Backlight: {}", e);
            }
        }

        let minute = engine.host().current_time_millis().div_euclid(TIME_TICK_MS);
        if minute != last_minute {
            last_minute = minute;
            engine.on_time_tick();
        }

        engine.poll_timer();

        if REDRAW.signaled() {
            REDRAW.reset();
            if engine.is_visible() {
                if let Err(e) = display.draw_face(&mut engine) {
                    defmt::warn!("Drawing watch face failed: {}", e);
                }
            }
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::default().into_config());
    defmt::info!("Initializing");

    // Initialize Backlight
    let mut backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        0,
    ));

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        &mut Delay,
    ));

    // Initialize watch face
    let time = TimeManager::init(TimeReference::new(UTC_EPOCH, Instant::now().as_millis()));
    let host = PineTimeHost::new(time, unwrap!(FixedOffset::east_opt(TIMEZONE)), &REDRAW);
    let config = FaceConfig::default();
    let mut engine = Engine::new(host, AnalogWatchface::new(config), &config);

    engine.on_create();
    engine.on_properties_changed(Properties {
        low_bit_ambient: LOW_BIT_AMBIENT,
        burn_in_protection: false,
    });
    engine.on_apply_window_insets(WindowInsets {
        is_round: false,
        system_window_inset_bottom: 0,
    });
    engine.on_visibility_changed(true);
    unwrap!(backlight.set(INTERACTIVE_BRIGHTNESS));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(run_watchface(engine, display, backlight)));
}
