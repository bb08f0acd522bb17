//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26, SPI2},
    spim::Spim,
};
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};

use crate::ui::{WatchFace, LCD_H, LCD_W};

type Lcd<'a> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI2>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

#[derive(Debug, defmt::Format)]
pub enum Error {
    Init,
    Draw,
}

pub struct Display<'a> {
    lcd: Lcd<'a>,
}

impl<'a> Display<'a> {
    /// Initialize the display
    pub fn init(
        spim: Spim<'a, SPI2>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst))
            .map_err(|_| Error::Init)?;

        Ok(Self { lcd })
    }

    /// Redraw the whole watchface.
    pub fn render<W: WatchFace>(&mut self, face: &W) -> Result<(), Error> {
        face.draw(&mut self.lcd).map_err(|_| Error::Draw)
    }
}
