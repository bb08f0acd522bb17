//! Time keeping module for PineTime

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike, Utc, Weekday};
use embassy_time::{Duration, Instant};

/// Buffer size for the time line ("00:00")
pub const TIME_LEN: usize = 8;
/// Buffer size for the status line ("Wed 31 - 100%")
pub const STATUS_LEN: usize = 16;

/// Hour format of the time line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    TwentyFourHour,
    TwelveHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Formatted text does not fit its buffer
    Format,
    /// Date arithmetic left the representable range
    OutOfRange,
}

/// Wall-clock time paired with the uptime it was observed at
#[derive(Debug, Clone, Copy)]
pub struct TimeReference {
    /// Clock time (UTC)
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UNIX timestamp in seconds
    pub fn from_timestamp(secs: i64, instant: Instant) -> Result<Self, Error> {
        let time = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or(Error::OutOfRange)?
            .naive_utc();
        Ok(Self { time, instant })
    }
}

pub struct TimeManager {
    reference: TimeReference,
    /// Offset of local time from UTC in seconds
    utc_offset: i32,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(utc_offset: i32) -> Self {
        Self {
            reference: TimeReference::default(),
            utc_offset,
        }
    }

    /// Local time at the given uptime.
    ///
    /// Instants before the reference resolve to the reference itself.
    pub fn local_time_at(&self, instant: Instant) -> Result<NaiveDateTime, Error> {
        let elapsed = instant.saturating_duration_since(self.reference.instant);
        let elapsed = TimeDelta::microseconds(elapsed.as_micros() as i64);

        self.reference
            .time
            .checked_add_signed(elapsed)
            .and_then(|utc| utc.checked_add_signed(TimeDelta::seconds(self.utc_offset.into())))
            .ok_or(Error::OutOfRange)
    }

    /// Get current local time
    pub fn now(&self) -> Result<NaiveDateTime, Error> {
        self.local_time_at(Instant::now())
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }
}

/// What the watchface shows for one minute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSnapshot {
    pub time: NaiveDateTime,
    pub charge_percent: u8,
}

/// Format the time line, `%H:%M` or `%I:%M`.
pub fn format_clock<'a>(
    buf: &'a mut [u8; TIME_LEN],
    time: &NaiveDateTime,
    style: ClockStyle,
    strip_leading_zero: bool,
) -> Result<&'a str, Error> {
    let hour = match style {
        ClockStyle::TwentyFourHour => time.hour(),
        ClockStyle::TwelveHour => time.hour12().1,
    };
    let text = format_no_std::show(buf, format_args!("{:02}:{:02}", hour, time.minute()))
        .map_err(|_| Error::Format)?;

    match text.strip_prefix('0') {
        Some(stripped) if strip_leading_zero => Ok(stripped),
        _ => Ok(text),
    }
}

/// Format the status line, `%a %e - N%`.
pub fn format_status<'a>(
    buf: &'a mut [u8; STATUS_LEN],
    time: &NaiveDateTime,
    charge_percent: u8,
) -> Result<&'a str, Error> {
    format_no_std::show(
        buf,
        format_args!(
            "{} {:>2} - {}%",
            weekday_abbrev(time.weekday()),
            time.day(),
            charge_percent
        ),
    )
    .map_err(|_| Error::Format)
}

/// Time left until the next minute starts.
pub fn until_next_minute(time: &NaiveDateTime) -> Duration {
    // Leap seconds report nanos beyond one second
    let millis = (time.nanosecond() / 1_000_000).min(999);
    let into_minute = time.second() * 1_000 + millis;
    Duration::from_millis(u64::from(60_000 - into_minute))
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
