//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

mod watchface;

pub use watchface::Watchface;

pub type ColorMode = Rgb565;

pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

/// Longest text a layer holds
pub const TEXT_CAPACITY: usize = 16;

/// Which set of layers is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Large time only
    Clock,
    /// Small time plus date and battery line
    Status,
}

pub trait WatchFace {
    /// Make exactly the layers of `mode` visible
    fn show(&mut self, mode: DisplayMode);

    /// Set the time line of every view
    fn set_time_text(&mut self, text: &str);

    /// Set the date and battery line
    fn set_status_text(&mut self, text: &str);

    /// Draw the background and all visible layers
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;
}

/// Positioned text surface with a visibility flag
pub struct TextLayer {
    bounds: Rectangle,
    font: &'static MonoFont<'static>,
    color: ColorMode,
    hidden: bool,
    text: String<TEXT_CAPACITY>,
}

impl TextLayer {
    pub fn new(bounds: Rectangle, font: &'static MonoFont<'static>) -> Self {
        Self {
            bounds,
            font,
            color: ColorMode::WHITE,
            hidden: false,
            text: String::new(),
        }
    }

    /// Replace the text, truncated to [`TEXT_CAPACITY`] bytes.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Draw the text centred at the top of the layer, clipped to its bounds.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        if self.hidden {
            return Ok(());
        }

        let character_style = MonoTextStyle::new(self.font, self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let position = Point::new(self.bounds.center().x, self.bounds.top_left.y);

        Text::with_text_style(&self.text, position, character_style, text_style)
            .draw(&mut target.clipped(&self.bounds))?;
        Ok(())
    }
}

/// Static background: black window with a frame around the time band
pub struct BorderLayer {
    frame: Rectangle,
    color: ColorMode,
    background: ColorMode,
}

impl BorderLayer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            color: ColorMode::WHITE,
            background: ColorMode::BLACK,
        }
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        target.clear(self.background)?;
        RoundedRectangle::with_equal_corners(self.frame, Size::new(12, 12))
            .into_styled(PrimitiveStyle::with_stroke(self.color, 3))
            .draw(target)
    }
}
