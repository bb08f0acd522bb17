//! Backlight control
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/backlight.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embedded_hal::digital::OutputPin;

/// Control the backlight.
///
/// There are three active-low backlight pins, each connected to a FET that
/// toggles backlight power through a resistor.
///
/// - Low: 2.2 kΩ
/// - Mid: 100 Ω
/// - High: 30 Ω
///
/// Through combinations of these pins, 7 brightness levels (+ off) can be
/// configured.
pub struct Backlight<P> {
    low: P,
    mid: P,
    high: P,

    /// The current brightness level (value between 0 and 7).
    brightness: u8,
}

impl<P> Backlight<P>
where
    P: OutputPin,
{
    /// Initialize the backlight with the specified level (0–7).
    pub fn init(low: P, mid: P, high: P, brightness: u8) -> Result<Self, Error> {
        let mut backlight = Self {
            low,
            mid,
            high,
            brightness: 0,
        };
        backlight.set(brightness)?;
        Ok(backlight)
    }

    /// Set the brightness level between 0 (off) and 7 (max brightness).
    pub fn set(&mut self, brightness: u8) -> Result<(), Error> {
        if brightness > 7 {
            return Err(Error::OutOfBounds);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Setting backlight brightness to {}", brightness);

        Self::drive(&mut self.low, brightness & 0x01 > 0)?;
        Self::drive(&mut self.mid, brightness & 0x02 > 0)?;
        Self::drive(&mut self.high, brightness & 0x04 > 0)?;
        self.brightness = brightness;

        Ok(())
    }

    /// Turn off the backlight.
    pub fn off(&mut self) -> Result<(), Error> {
        self.set(0)
    }

    /// Return the current brightness level (value between 0 and 7).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    // Pins are active low
    fn drive(pin: &mut P, on: bool) -> Result<(), Error> {
        if on {
            pin.set_low().map_err(|_| Error::Pin)
        } else {
            pin.set_high().map_err(|_| Error::Pin)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    OutOfBounds,
    Pin,
}
