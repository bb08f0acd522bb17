//! Events delivered to the watchface
//!
//! Every stimulus the watchface reacts to arrives as a [`WatchEvent`]. The
//! firmware funnels them through a single channel so handlers run one at a
//! time and to completion.

use chrono::NaiveDateTime;
use embassy_time::Duration;

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in sample order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis in an `[x, y, z]` sample.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A tap detected on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapEvent {
    pub axis: Axis,
    /// +1 or -1
    pub direction: i8,
}

/// Handle of a scheduled reversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// A new wall-clock minute started
    MinuteTick(NaiveDateTime),
    /// The accelerometer reported a tap
    Tap(TapEvent),
    /// A scheduled reversion fired
    RevertTimeout(TimerHandle),
}

#[cfg(feature = "defmt")]
impl defmt::Format for WatchEvent {
    fn format(&self, f: defmt::Formatter) {
        use chrono::Timelike;

        match self {
            WatchEvent::MinuteTick(time) => {
                defmt::write!(f, "MinuteTick({}:{})", time.hour(), time.minute())
            }
            WatchEvent::Tap(tap) => defmt::write!(f, "Tap({})", tap),
            WatchEvent::RevertTimeout(handle) => defmt::write!(f, "RevertTimeout({})", handle),
        }
    }
}

/// One-shot timer used to leave the status view.
///
/// Firing is reported back as [`WatchEvent::RevertTimeout`] carrying the
/// handle returned here.
pub trait ReversionTimer {
    fn schedule(&mut self, after: Duration) -> TimerHandle;
}
