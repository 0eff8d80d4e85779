//! Absolute time axis and step-function record lookup.

use chrono::NaiveDateTime;

use crate::encoding::TimeEncoding;
use crate::error::TimeError;

/// Default tolerance, in minutes, for step-function lookups.
pub const DEFAULT_TIME_TOLERANCE_MIN: f64 = 1e-3;

/// Largest backwards step, in minutes, tolerated between consecutive entries.
pub const MONOTONIC_TOLERANCE_MIN: f64 = 1e-9;

/// A grid file's time axis expressed in minutes since a simulation epoch.
///
/// Built once per file and read-only afterwards. Entries are guaranteed
/// non-decreasing (within [`MONOTONIC_TOLERANCE_MIN`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    encoding: TimeEncoding,
    minutes: Vec<f64>,
}

impl TimeAxis {
    /// Resolve raw offsets against `encoding` and express them relative to
    /// `epoch`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::NonMonotonicTimeAxis`] if any entry decreases by
    /// more than [`MONOTONIC_TOLERANCE_MIN`] relative to its predecessor.
    pub fn resolve(
        encoding: TimeEncoding,
        offsets: &[f64],
        epoch: NaiveDateTime,
    ) -> Result<Self, TimeError> {
        let base_shift = signed_minutes_between(epoch, encoding.base_time());
        let factor = encoding.unit_factor_minutes();

        let minutes: Vec<f64> = offsets.iter().map(|&v| base_shift + v * factor).collect();

        for (index, pair) in minutes.windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);
            if current < previous - MONOTONIC_TOLERANCE_MIN {
                return Err(TimeError::NonMonotonicTimeAxis {
                    index: index + 1,
                    previous,
                    current,
                });
            }
        }

        Ok(Self { encoding, minutes })
    }

    /// The encoding the axis was resolved from.
    pub fn encoding(&self) -> TimeEncoding {
        self.encoding
    }

    /// Axis entries in minutes since the epoch.
    pub fn minutes(&self) -> &[f64] {
        &self.minutes
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    /// Minutes of entry `index`, if present.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.minutes.get(index).copied()
    }

    /// Index of the record in force at `target` minutes.
    ///
    /// Returns the last entry `<= target + tolerance`. Targets more than
    /// `tolerance` before the first entry or after the last entry are an
    /// error unless `clamp` is set, in which case the nearest end is used.
    ///
    /// # Errors
    ///
    /// - [`TimeError::EmptyAxis`] if the axis has no entries.
    /// - [`TimeError::TimeOutOfRange`] if `target` is outside the axis and
    ///   `clamp` is false.
    pub fn index_at(&self, target: f64, tolerance: f64, clamp: bool) -> Result<usize, TimeError> {
        let (Some(&first), Some(&last)) = (self.minutes.first(), self.minutes.last()) else {
            return Err(TimeError::EmptyAxis);
        };
        let last_index = self.minutes.len() - 1;

        let out_of_range = || TimeError::TimeOutOfRange {
            target,
            first,
            last,
            tolerance,
        };

        if target < first - tolerance {
            return if clamp { Ok(0) } else { Err(out_of_range()) };
        }
        if target > last + tolerance {
            return if clamp {
                Ok(last_index)
            } else {
                Err(out_of_range())
            };
        }

        let upper = target + tolerance;
        let count = self.minutes.partition_point(|&m| m <= upper);
        Ok(count.saturating_sub(1))
    }
}

/// `to - from` in fractional minutes, microsecond resolution.
fn signed_minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 60_000_000.0,
        None => delta.num_seconds() as f64 / 60.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::parse_time_units;
    use chrono::NaiveDate;

    fn epoch(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hourly_axis() -> TimeAxis {
        let enc = parse_time_units("hours since 2000-01-01 00:00:00").unwrap();
        TimeAxis::resolve(enc, &[0.0, 1.0, 2.0], epoch(2000, 1, 1)).unwrap()
    }

    #[test]
    fn resolves_relative_to_epoch() {
        let enc = parse_time_units("hours since 1999-12-31 00:00:00").unwrap();
        let axis = TimeAxis::resolve(enc, &[24.0, 25.0], epoch(2000, 1, 1)).unwrap();
        assert_eq!(axis.minutes(), &[0.0, 60.0]);
    }

    #[test]
    fn step_function_holds_previous_record() {
        let axis = hourly_axis();
        assert_eq!(axis.index_at(59.9999, 1e-3, false).unwrap(), 0);
        assert_eq!(axis.index_at(60.0, 1e-3, false).unwrap(), 1);
        assert_eq!(axis.index_at(119.9995, 1e-3, false).unwrap(), 2);
        assert_eq!(axis.index_at(120.0, 1e-3, false).unwrap(), 2);
    }

    #[test]
    fn before_start_fails_or_clamps() {
        let axis = hourly_axis();
        let err = axis.index_at(-0.1, 1e-3, false).unwrap_err();
        assert!(matches!(err, TimeError::TimeOutOfRange { .. }));
        assert_eq!(axis.index_at(-0.1, 1e-3, true).unwrap(), 0);
    }

    #[test]
    fn after_end_fails_or_clamps() {
        let axis = hourly_axis();
        assert!(axis.index_at(500.0, 1e-3, false).is_err());
        assert_eq!(axis.index_at(500.0, 1e-3, true).unwrap(), 2);
    }

    #[test]
    fn within_tolerance_of_first_is_index_zero() {
        let axis = hourly_axis();
        assert_eq!(axis.index_at(-0.0005, 1e-3, false).unwrap(), 0);
    }

    #[test]
    fn duplicate_entries_resolve_to_latest() {
        let enc = parse_time_units("minutes since 2000-01-01").unwrap();
        let axis = TimeAxis::resolve(enc, &[0.0, 60.0, 60.0, 120.0], epoch(2000, 1, 1)).unwrap();
        assert_eq!(axis.index_at(60.0, 1e-3, false).unwrap(), 2);
    }

    #[test]
    fn decreasing_axis_is_fatal() {
        let enc = parse_time_units("minutes since 2000-01-01").unwrap();
        let err = TimeAxis::resolve(enc, &[0.0, 60.0, 30.0], epoch(2000, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            TimeError::NonMonotonicTimeAxis {
                index: 2,
                previous: 60.0,
                current: 30.0,
            }
        );
    }

    #[test]
    fn empty_axis_lookup_fails() {
        let enc = parse_time_units("minutes since 2000-01-01").unwrap();
        let axis = TimeAxis::resolve(enc, &[], epoch(2000, 1, 1)).unwrap();
        assert!(axis.is_empty());
        assert_eq!(axis.index_at(0.0, 1e-3, true), Err(TimeError::EmptyAxis));
    }
}
