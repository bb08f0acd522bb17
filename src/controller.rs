//! View-state controller
//!
//! Owns the visible view and the one pending reversion. A qualifying flick
//! switches to the status view and schedules a return to the clock view;
//! flicks arriving while that return is pending are ignored.
//!
//! Invariant: a reversion is pending only while the status view is shown.

use chrono::NaiveDateTime;

use crate::{
    event::{ReversionTimer, TapEvent, TimerHandle, WatchEvent},
    peripherals::battery::ChargeGauge,
    system::{
        config::WatchfaceConfig,
        time::{self, format_clock, format_status, TimeSnapshot, STATUS_LEN, TIME_LEN},
    },
    ui::{DisplayMode, WatchFace},
};

pub struct ViewController<W, T, G> {
    face: W,
    timer: T,
    gauge: G,
    config: WatchfaceConfig,
    mode: DisplayMode,
    pending: Option<TimerHandle>,
}

impl<W, T, G> ViewController<W, T, G>
where
    W: WatchFace,
    T: ReversionTimer,
    G: ChargeGauge,
{
    pub fn new(mut face: W, timer: T, gauge: G, config: WatchfaceConfig) -> Self {
        face.show(DisplayMode::Clock);
        Self {
            face,
            timer,
            gauge,
            config,
            mode: DisplayMode::Clock,
            pending: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn face(&self) -> &W {
        &self.face
    }

    /// Dispatch one event. Returns whether the watchface must be redrawn.
    pub fn handle(&mut self, event: WatchEvent) -> Result<bool, time::Error> {
        match event {
            WatchEvent::MinuteTick(now) => self.on_minute_tick(now).map(|_| true),
            WatchEvent::Tap(tap) => Ok(self.on_tap(tap)),
            WatchEvent::RevertTimeout(handle) => Ok(self.on_timer_fire(handle)),
        }
    }

    /// Show the status view on a flick along the configured axis.
    pub fn on_tap(&mut self, tap: TapEvent) -> bool {
        if tap.axis != self.config.flick_axis {
            return false;
        }
        if self.pending.is_some() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Flick ignored, reversion pending");
            return false;
        }

        self.mode = DisplayMode::Status;
        self.face.show(DisplayMode::Status);
        let handle = self.timer.schedule(self.config.revert_timeout);
        self.pending = Some(handle);

        #[cfg(feature = "defmt")]
        defmt::info!("Status view until {}", handle);

        true
    }

    /// Return to the clock view. Stale handles are ignored.
    pub fn on_timer_fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending != Some(handle) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Stale reversion {} ignored", handle);
            return false;
        }

        self.pending = None;
        self.mode = DisplayMode::Clock;
        self.face.show(DisplayMode::Clock);

        #[cfg(feature = "defmt")]
        defmt::info!("Clock view");

        true
    }

    /// Refresh the texts of every layer. Never changes the view.
    pub fn on_minute_tick(&mut self, now: NaiveDateTime) -> Result<(), time::Error> {
        let snapshot = TimeSnapshot {
            time: now,
            charge_percent: self.gauge.charge_percent(),
        };

        let mut time_buf = [0u8; TIME_LEN];
        let time_text = format_clock(
            &mut time_buf,
            &snapshot.time,
            self.config.clock_style,
            self.config.strip_leading_zero,
        )?;
        let mut status_buf = [0u8; STATUS_LEN];
        let status_text = format_status(&mut status_buf, &snapshot.time, snapshot.charge_percent)?;

        self.face.set_time_text(time_text);
        self.face.set_status_text(status_text);

        #[cfg(feature = "defmt")]
        defmt::debug!("Time updated: {} / {}", time_text, status_text);

        Ok(())
    }
}
