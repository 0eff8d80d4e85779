//! Minutes-since-forcing-start arithmetic.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimeError;

/// Parse a `YYYYMMDD` date string.
///
/// # Errors
///
/// Returns [`TimeError::InvalidDate`] if the string is not eight digits or
/// does not name a real calendar day.
pub fn parse_yyyymmdd(value: &str) -> Result<NaiveDate, TimeError> {
    let trimmed = value.trim();
    let invalid = || TimeError::InvalidDate {
        value: value.to_string(),
    };
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = trimmed[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = trimmed[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = trimmed[6..8].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// `YYYYMMDD` integer for a date.
pub fn yyyymmdd(date: NaiveDate) -> u32 {
    // Negative years never occur in forcing data.
    date.year().max(0) as u32 * 10_000 + date.month() * 100 + date.day()
}

/// The forcing start instant that every "minutes" value is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcingClock {
    start: NaiveDateTime,
}

impl ForcingClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { start }
    }

    /// Clock starting at midnight of a `YYYYMMDD` integer date.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidDate`] for impossible dates.
    pub fn from_yyyymmdd(value: u32) -> Result<Self, TimeError> {
        let date = parse_yyyymmdd(&format!("{value:08}"))?;
        Ok(Self::new(date.and_time(NaiveTime::MIN)))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Forcing start as a `YYYYMMDD` integer.
    pub fn start_yyyymmdd(&self) -> u32 {
        yyyymmdd(self.start.date())
    }

    /// Absolute instant `minutes` after the start, rounded to the microsecond.
    pub fn at(&self, minutes: f64) -> NaiveDateTime {
        let micros = (minutes * 60_000_000.0).round() as i64;
        self.start + Duration::microseconds(micros)
    }

    /// Fractional minutes from the start to `instant`.
    pub fn minutes_since(&self, instant: NaiveDateTime) -> f64 {
        let delta = instant - self.start;
        match delta.num_microseconds() {
            Some(us) => us as f64 / 60_000_000.0,
            None => delta.num_seconds() as f64 / 60.0,
        }
    }

    /// Instant of the grid step containing `minutes`.
    ///
    /// The query is first rounded to the nearest whole minute, then floored
    /// onto a grid of `step_min` minutes anchored at midnight of that day.
    pub fn floor_to_step(&self, minutes: f64, step_min: i64) -> NaiveDateTime {
        let instant = self.start + Duration::minutes(minutes.round() as i64);
        let midnight = instant.date().and_time(NaiveTime::MIN);
        let since_midnight = (instant - midnight).num_minutes();
        let step = step_min.max(1);
        midnight + Duration::minutes(since_midnight.div_euclid(step) * step)
    }
}
