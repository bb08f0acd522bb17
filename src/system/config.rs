//! General system configuration

use embassy_time::Duration;

use crate::{event::Axis, system::time::ClockStyle};

/// Watchface behaviour settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchfaceConfig {
    /// How long the status view stays up after a flick
    pub revert_timeout: Duration,
    /// 24-hour or 12-hour time line
    pub clock_style: ClockStyle,
    /// Drop the leading zero of the hour ("07:05" -> "7:05")
    pub strip_leading_zero: bool,
    /// Offset of local time from UTC in seconds
    pub utc_offset: i32,
    /// Axis a tap must occur on to count as a wrist flick
    pub flick_axis: Axis,
    /// Minimum per-sample change on the flick axis, in raw accelerometer counts
    pub flick_threshold: i16,
    /// Dead time after a detected flick
    pub flick_cooldown_ms: u32,
    /// Backlight level (0–7)
    pub brightness: u8,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            revert_timeout: Duration::from_millis(5_000),
            clock_style: ClockStyle::TwentyFourHour,
            strip_leading_zero: false,
            utc_offset: 3_600,
            flick_axis: Axis::Y,
            // ~1.5g at ±4g range (512 counts per g)
            flick_threshold: 768,
            flick_cooldown_ms: 300,
            brightness: 2,
        }
    }
}

#[cfg(feature = "pinetime")]
pub use self::nrf::SystemConfig;

#[cfg(feature = "pinetime")]
mod nrf {
    use embassy_nrf::{
        config::{Config, Debug, HfclkSource, LfclkSource},
        interrupt::Priority,
    };

    pub struct SystemConfig {}

    impl SystemConfig {
        /// Create new system configuration
        pub fn new() -> Config {
            // Generate default config, required because Config is set as
            // `non_exhaustive`
            let mut config = Config::default();

            // Set high-frequency and low-frequency clock sources to external
            config.hfclk_source = HfclkSource::ExternalXtal;
            config.lfclk_source = LfclkSource::ExternalXtal;

            // Enable DC/DC regulator to massively reduce runtime current consumption
            config.dcdc.reg1 = true;

            // Keep GPIOTE and the RTC time driver off the highest priority
            config.gpiote_interrupt_priority = Priority::P2;
            config.time_interrupt_priority = Priority::P2;

            // Allow debugging
            config.debug = Debug::Allowed;

            config
        }
    }
}
