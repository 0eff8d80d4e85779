//! Parsing of CF-style `"<unit> since <base>"` time encodings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimeError;

const MINUTES_PER_SECOND: f64 = 1.0 / 60.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 1440.0;

/// A resolved time encoding: how many minutes one raw offset unit spans,
/// and the absolute datetime that offset zero refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeEncoding {
    unit_factor_minutes: f64,
    base_time: NaiveDateTime,
}

impl TimeEncoding {
    /// Creates an encoding from an explicit factor and base time.
    pub fn new(unit_factor_minutes: f64, base_time: NaiveDateTime) -> Self {
        Self {
            unit_factor_minutes,
            base_time,
        }
    }

    /// Minutes represented by one raw offset unit.
    pub fn unit_factor_minutes(&self) -> f64 {
        self.unit_factor_minutes
    }

    /// Absolute time of raw offset zero.
    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }
}

/// Parse a `"<unit> since <base datetime>"` string.
///
/// The unit is matched case-insensitively by prefix against `second`,
/// `minute`, `hour` and `day`. The base must start with `YYYY-MM-DD`,
/// optionally followed by `HH:MM[:SS]` separated by a space or `T`.
/// Fractional or malformed seconds are read as zero.
///
/// # Errors
///
/// Returns [`TimeError::UnsupportedTimeEncoding`] if the `since` separator
/// or a recognisable unit is missing, or if the base date cannot be parsed.
pub fn parse_time_units(units: &str) -> Result<TimeEncoding, TimeError> {
    let fail = |reason: &str| TimeError::UnsupportedTimeEncoding {
        units: units.to_string(),
        reason: reason.to_string(),
    };

    let lowered = units.trim().to_lowercase();
    let (unit_part, base_part) = lowered
        .split_once("since")
        .ok_or_else(|| fail("missing 'since' separator"))?;

    let unit_part = unit_part.trim();
    let unit_factor_minutes = if unit_part.starts_with("second") {
        MINUTES_PER_SECOND
    } else if unit_part.starts_with("minute") {
        1.0
    } else if unit_part.starts_with("hour") {
        MINUTES_PER_HOUR
    } else if unit_part.starts_with("day") {
        MINUTES_PER_DAY
    } else {
        return Err(fail("unrecognised time unit"));
    };

    let base_part = base_part.trim().replace('t', " ");
    let mut tokens = base_part.split_whitespace();
    let date_str = tokens.next().ok_or_else(|| fail("missing base date"))?;
    let time_str = tokens.next().unwrap_or("00:00:00");

    let date = parse_date(date_str).ok_or_else(|| fail("base date is not YYYY-MM-DD"))?;
    let time = parse_clock_time(time_str).ok_or_else(|| fail("base time is not HH:MM[:SS]"))?;

    Ok(TimeEncoding::new(
        unit_factor_minutes,
        NaiveDateTime::new(date, time),
    ))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    let second = parts
        .get(2)
        .and_then(|p| p.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map_or(0, |v| v as u32);
    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn hours_with_full_base() {
        let enc = parse_time_units("hours since 1900-01-01 00:00:0.0").unwrap();
        assert_eq!(enc.unit_factor_minutes(), 60.0);
        assert_eq!(enc.base_time(), ymd_hms(1900, 1, 1, 0, 0, 0));
    }

    #[test]
    fn unit_prefixes_are_case_insensitive() {
        assert_eq!(
            parse_time_units("Seconds since 2000-01-01")
                .unwrap()
                .unit_factor_minutes(),
            1.0 / 60.0
        );
        assert_eq!(
            parse_time_units("MINUTES since 2000-01-01")
                .unwrap()
                .unit_factor_minutes(),
            1.0
        );
        assert_eq!(
            parse_time_units("day since 2000-01-01")
                .unwrap()
                .unit_factor_minutes(),
            1440.0
        );
    }

    #[test]
    fn iso_t_separator() {
        let enc = parse_time_units("hours since 2010-06-15T06:30:00").unwrap();
        assert_eq!(enc.base_time(), ymd_hms(2010, 6, 15, 6, 30, 0));
    }

    #[test]
    fn hour_minute_without_seconds() {
        let enc = parse_time_units("minutes since 2001-02-03 04:05").unwrap();
        assert_eq!(enc.base_time(), ymd_hms(2001, 2, 3, 4, 5, 0));
    }

    #[test]
    fn date_only_defaults_to_midnight() {
        let enc = parse_time_units("days since 1970-01-01").unwrap();
        assert_eq!(enc.base_time(), ymd_hms(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn missing_since_is_rejected() {
        let err = parse_time_units("hours from 1900-01-01").unwrap_err();
        assert!(matches!(err, TimeError::UnsupportedTimeEncoding { .. }));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = parse_time_units("weeks since 1900-01-01").unwrap_err();
        assert!(matches!(err, TimeError::UnsupportedTimeEncoding { .. }));
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(parse_time_units("hours since 1900/01/01").is_err());
        assert!(parse_time_units("hours since 1900-13-01").is_err());
        assert!(parse_time_units("hours since").is_err());
    }

    #[test]
    fn bad_hour_is_rejected() {
        assert!(parse_time_units("hours since 1900-01-01 xx:00").is_err());
    }
}
