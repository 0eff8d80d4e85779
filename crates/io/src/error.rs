//! Error types for forcmatch-io.

use std::path::PathBuf;

use forcmatch_grid::GridError;
use forcmatch_time::TimeError;

/// Error type for all fallible operations in the forcmatch-io crate.
///
/// Read faults carry the file, variable and index involved so a failed
/// regression run points straight at the offending cell.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when reading a variable fails inside the NetCDF library.
    #[error("failed to read '{var}' from {}: {reason}", path.display())]
    ReadFailed {
        /// Variable being read.
        var: String,
        /// File being read.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a variable lacks a dimension the read needs.
    #[error("variable '{var}' in {} has no dimension '{dim}'", path.display())]
    MissingDimension {
        /// Variable inspected.
        var: String,
        /// Dimension that was expected.
        dim: String,
        /// File inspected.
        path: PathBuf,
    },

    /// Returned when a read index lies past the end of a dimension.
    #[error("index {index} out of bounds for dimension '{dim}' (len {len}) of '{var}' in {}", path.display())]
    IndexOutOfBounds {
        /// Variable being read.
        var: String,
        /// Dimension indexed.
        dim: String,
        /// Requested index.
        index: usize,
        /// Dimension length.
        len: usize,
        /// File being read.
        path: PathBuf,
    },

    /// Returned when a read value equals the variable's fill or missing sentinel.
    #[error("masked value for '{var}' at {index:?} in {}", path.display())]
    MaskedValue {
        /// Variable being read.
        var: String,
        /// Index per variable dimension.
        index: Vec<usize>,
        /// File being read.
        path: PathBuf,
    },

    /// Returned when a read value is NaN or infinite.
    #[error("non-finite value for '{var}' at {index:?} in {}", path.display())]
    NonFiniteValue {
        /// Variable being read.
        var: String,
        /// Index per variable dimension.
        index: Vec<usize>,
        /// File being read.
        path: PathBuf,
    },

    /// Returned for a missing or malformed entry in a text input file.
    #[error("{}:{line}: {reason}", path.display())]
    Config {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number, or 0 when the problem is not tied to a line.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Returned when a legacy binary file ends inside a record.
    #[error("truncated legacy binary {} at byte {offset}: {reason}", path.display())]
    Truncated {
        /// File being parsed.
        path: PathBuf,
        /// Byte offset where the short read started.
        offset: u64,
        /// Which part of the file was short.
        reason: String,
    },

    /// Returned when no record lies within tolerance of a requested time.
    #[error("time {target} min not found within tolerance {tolerance} (closest error {closest_error})")]
    TimeNotFound {
        /// Requested time in minutes.
        target: f64,
        /// Accepted distance in minutes.
        tolerance: f64,
        /// Distance of the closest record.
        closest_error: f64,
    },

    /// Wraps an underlying filesystem error.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Wraps an error from time-axis resolution.
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Wraps an error from grid-axis construction.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl IoError {
    pub(crate) fn config(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        IoError::Config {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return IoError::FileNotFound { path: path.into() };
        }
        IoError::Io {
            path: path.into(),
            source,
        }
    }
}
