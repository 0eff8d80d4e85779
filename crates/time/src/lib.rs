//! # forcmatch-time
//!
//! Time-axis resolution for gridded forcing files.
//!
//! A grid file describes its time axis as raw offsets plus a CF-style
//! `"<unit> since <base>"` string. This crate turns that pair into absolute
//! minutes relative to the forcing start and answers the step-function
//! question "which record is in force at time T".
//!
//! ```text
//!  "hours since 1900-01-01"  ──parse_time_units()──▶  TimeEncoding
//!  offsets + TimeEncoding    ──TimeAxis::resolve()──▶  TimeAxis (minutes)
//!  TimeAxis                  ──index_at(T, tol, clamp)──▶  record index
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use forcmatch_time::{ForcingClock, TimeAxis, parse_time_units};
//!
//! let clock = ForcingClock::from_yyyymmdd(20000101)?;
//! let encoding = parse_time_units("hours since 2000-01-01 00:00:00")?;
//! let axis = TimeAxis::resolve(encoding, &[0.0, 1.0, 2.0], clock.start())?;
//! assert_eq!(axis.index_at(61.0, 1e-3, false)?, 1);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `encoding` | `"<unit> since <base>"` parsing |
//! | `axis` | Absolute time axis and step-function lookup |
//! | `clock` | Minutes-since-forcing-start arithmetic and step flooring |
//! | `error` | Error types |

mod axis;
mod clock;
mod encoding;
mod error;

pub use axis::{DEFAULT_TIME_TOLERANCE_MIN, MONOTONIC_TOLERANCE_MIN, TimeAxis};
pub use clock::{ForcingClock, parse_yyyymmdd, yyyymmdd};
pub use encoding::{TimeEncoding, parse_time_units};
pub use error::TimeError;
