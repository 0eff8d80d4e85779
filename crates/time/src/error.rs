//! Error types for the forcmatch-time crate.

/// Error type for all fallible operations in the forcmatch-time crate.
///
/// Covers unparseable time encodings, time axes that run backwards, and
/// step-function lookups that fall outside the axis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    /// Returned when a `"<unit> since <base>"` string cannot be understood.
    #[error("unsupported time encoding '{units}': {reason}")]
    UnsupportedTimeEncoding {
        /// The raw units string.
        units: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Returned when an axis entry precedes its predecessor.
    #[error(
        "non-monotonic time axis at index {index}: {current} min follows {previous} min"
    )]
    NonMonotonicTimeAxis {
        /// Index of the offending entry.
        index: usize,
        /// Absolute minutes of the previous entry.
        previous: f64,
        /// Absolute minutes of the offending entry.
        current: f64,
    },

    /// Returned when a lookup target lies outside the axis and clamping is off.
    #[error("time {target} min out of range [{first}, {last}] (tolerance {tolerance} min)")]
    TimeOutOfRange {
        /// Requested time in minutes.
        target: f64,
        /// First axis entry in minutes.
        first: f64,
        /// Last axis entry in minutes.
        last: f64,
        /// Tolerance applied at both ends.
        tolerance: f64,
    },

    /// Returned when a time axis has no entries.
    #[error("time axis is empty")]
    EmptyAxis,

    /// Returned when a calendar date cannot be constructed.
    #[error("invalid date: {value}")]
    InvalidDate {
        /// The offending input.
        value: String,
    },
}
