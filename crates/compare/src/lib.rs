//! # forcmatch-compare
//!
//! Sampled regression comparisons and their reports.
//!
//! - [`compare_forcing`]: baseline station CSV forcing against NetCDF point
//!   queries, per `(station, time)` sample and per variable.
//! - [`compare_output`]: legacy binary model output against a NetCDF
//!   output variable, per `(time, object index)` sample.
//!
//! Reports serialize with `serde` to the JSON layout written by
//! [`write_json`]; differences are always `reference - netcdf`.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `forcing` | Forcing comparison request, samples, report |
//! | `output` | Model-output comparison request, samples, report |
//! | `variables` | Per-variable values keyed by legacy column |
//! | `summary` | Difference statistics |
//! | `report` | JSON output and `%g` number formatting |
//! | `error` | Error types |

mod error;
mod forcing;
mod output;
mod report;
mod summary;
mod variables;

pub use error::CompareError;
pub use forcing::{
    DEFAULT_STATIONS, DEFAULT_TIMES_MIN, ForcingCompareRequest, ForcingReport, ForcingSample,
    compare_forcing,
};
pub use output::{
    DEFAULT_COLUMN_COUNT, DEFAULT_OUTPUT_TIME_TOLERANCE_MIN, DEFAULT_RECORD_COUNT,
    OutputCompareRequest, OutputReport, OutputSample, compare_output, infer_object_dimension,
};
pub use report::{format_g, to_json, write_json};
pub use summary::{OutputSummary, VariableSummary};
pub use variables::{PerVariable, difference};
