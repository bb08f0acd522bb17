//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryInfo {
    /// Charging state
    pub charging: bool,

    /// Battery percentage
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidMeasurement,
}

/// Instantaneous battery charge query
pub trait ChargeGauge {
    /// Charge in percent (0–100)
    fn charge_percent(&self) -> u8;
}

/// Convert a 12-bit SAADC measurement into a battery voltage in millivolts.
pub fn millivolts_from_adc(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
            // Use u32 during calculation to prevent overflow
            let adc_val = u32::from(raw_measurement as u16);
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate battery capacity from its voltage.
pub fn percent_from_millivolts(voltage: u16) -> u8 {
    // Fixed data points with linear interpolation in between
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[cfg(feature = "pinetime")]
pub use self::saadc::BatteryStatus;

#[cfg(feature = "pinetime")]
mod saadc {
    use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

    use super::{millivolts_from_adc, percent_from_millivolts, BatteryInfo, Error};

    pub struct BatteryStatus<'a> {
        /// Pin P0.12: High = battery, Low = charging
        pin_charge_indication: Input<'a, P0_12>,

        /// Saadc instance, channel 0 on P0.31
        saadc: Saadc<'a, 1>,

        info: BatteryInfo,
    }

    impl<'a> BatteryStatus<'a> {
        /// Initialize battery status
        pub async fn init(
            pin_charge_indication: Input<'a, P0_12>,
            saadc: Saadc<'a, 1>,
        ) -> Result<Self, Error> {
            let mut battery = Self {
                pin_charge_indication,
                saadc,
                info: BatteryInfo::default(),
            };
            battery.update().await?;
            Ok(battery)
        }

        /// Return current state of the battery.
        ///
        /// This returns the stored value. To fetch current data, call `update()` first.
        pub fn info(&self) -> BatteryInfo {
            self.info
        }

        /// Update the current battery status by reading information from the
        /// hardware. Return whether or not the values changed.
        pub async fn update(&mut self) -> Result<bool, Error> {
            let mut buf = [0; 1];
            self.saadc.sample(&mut buf).await;

            let info = BatteryInfo {
                charging: self.pin_charge_indication.is_low(),
                percent: percent_from_millivolts(millivolts_from_adc(buf[0])?),
            };
            let changed = info != self.info;
            self.info = info;

            Ok(changed)
        }
    }
}
