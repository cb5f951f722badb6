//! Chip configuration for the watch face firmware

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::Priority,
};

pub struct SystemConfig {
    /// Priority of the RTC time driver and the GPIOTE interrupts. The face
    /// loop sleeps on the RTC, so it must not sit below the SPIM transfer
    /// that redraws the panel.
    pub interrupt_priority: Priority,
    /// Keep the SWD port open for probe-rs and defmt-rtt
    pub debug: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            interrupt_priority: Priority::P2,
            debug: true,
        }
    }
}

impl SystemConfig {
    pub fn into_config(self) -> Config {
        // Config is `non_exhaustive`
        let mut config = Config::default();

        // The RTC behind the wall clock runs from the 32 kHz crystal
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // DC/DC regulator cuts the runtime current
        config.dcdc.reg1 = true;

        config.gpiote_interrupt_priority = self.interrupt_priority;
        config.time_interrupt_priority = self.interrupt_priority;

        config.debug = if self.debug {
            Debug::Allowed
        } else {
            Debug::Disallowed
        };

        config
    }
}
