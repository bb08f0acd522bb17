//! Flick watchface
//!
//! A large time line in the clock view; a smaller time line plus a date and
//! battery line in the status view. Both views sit on a framed background.

use embedded_graphics::{
    geometry::{Point, Size},
    prelude::DrawTarget,
    primitives::Rectangle,
};
use profont::{PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use super::{BorderLayer, ColorMode, DisplayMode, TextLayer, WatchFace};

const TIME_BAND: Rectangle = Rectangle::new(Point::new(8, 64), Size::new(224, 112));
const CLOCK_TIME: Rectangle = Rectangle::new(Point::new(0, 94), Size::new(240, 34));
const STATUS_TIME: Rectangle = Rectangle::new(Point::new(0, 80), Size::new(240, 30));
const STATUS_LINE: Rectangle = Rectangle::new(Point::new(0, 128), Size::new(240, 24));

pub struct Watchface {
    background: BorderLayer,
    /// Time line of the clock view
    clock_time: TextLayer,
    /// Time line of the status view
    status_time: TextLayer,
    /// Date and battery line of the status view
    status_line: TextLayer,
}

impl Watchface {
    pub fn new() -> Self {
        let mut face = Self {
            background: BorderLayer::new(TIME_BAND),
            clock_time: TextLayer::new(CLOCK_TIME, &PROFONT_24_POINT),
            status_time: TextLayer::new(STATUS_TIME, &PROFONT_18_POINT),
            status_line: TextLayer::new(STATUS_LINE, &PROFONT_14_POINT),
        };
        face.show(DisplayMode::Clock);
        face
    }

    pub fn clock_time(&self) -> &TextLayer {
        &self.clock_time
    }

    pub fn status_time(&self) -> &TextLayer {
        &self.status_time
    }

    pub fn status_line(&self) -> &TextLayer {
        &self.status_line
    }
}

impl Default for Watchface {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchFace for Watchface {
    fn show(&mut self, mode: DisplayMode) {
        let status = mode == DisplayMode::Status;
        self.clock_time.set_hidden(status);
        self.status_time.set_hidden(!status);
        self.status_line.set_hidden(!status);
    }

    fn set_time_text(&mut self, text: &str) {
        self.clock_time.set_text(text);
        self.status_time.set_text(text);
    }

    fn set_status_text(&mut self, text: &str) {
        self.status_line.set_text(text);
    }

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.background.draw(target)?;
        self.clock_time.draw(target)?;
        self.status_time.draw(target)?;
        self.status_line.draw(target)
    }
}
