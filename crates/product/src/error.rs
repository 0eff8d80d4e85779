//! Error types for the forcmatch-product crate.

use std::path::PathBuf;

use forcmatch_grid::GridError;
use forcmatch_io::IoError;
use forcmatch_time::TimeError;

/// Error type for forcing-source configuration and point queries.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Returned when a forcing-source configuration is incomplete or invalid.
    #[error("invalid forcing configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },

    /// Returned when `PRODUCT` names an unsupported product family.
    #[error("unsupported forcing product '{name}' (expected CMFD2, ERA5 or GLDAS)")]
    UnsupportedProduct {
        /// The configured product name.
        name: String,
    },

    /// Returned when a file pattern matches zero or several files.
    #[error("pattern must match exactly 1 file, got {count}: {pattern}")]
    AmbiguousSourceFile {
        /// The expanded glob pattern.
        pattern: String,
        /// Number of matching files.
        count: usize,
    },

    /// Returned when a precipitation `units` string is not recognised and
    /// no override is configured.
    #[error("unknown precipitation units '{units}' for '{var}' in {}", path.display())]
    UnknownPrecipUnits {
        /// The declared units attribute (empty when absent).
        units: String,
        /// The precipitation variable.
        var: String,
        /// File holding the variable.
        path: PathBuf,
    },

    /// Returned when the step after an ERA5 hour lies past the file's time axis.
    #[error("need lookahead beyond time axis of {}: index {index}, length {len}", path.display())]
    LookaheadBeyondAxis {
        /// File whose axis was exhausted.
        path: PathBuf,
        /// Index of the current step.
        index: usize,
        /// Length of the time axis.
        len: usize,
    },

    /// Returned when the interval between two accumulated-field steps is
    /// not a positive finite number of seconds.
    #[error("invalid accumulation interval {dt_seconds} s in {}", path.display())]
    InvalidStep {
        /// The computed interval.
        dt_seconds: f64,
        /// File of the first step.
        path: PathBuf,
    },

    /// Wraps a file read or format error.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Wraps a time-axis fault.
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Wraps a spatial lookup fault.
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_ambiguous_source_file() {
        let err = ProductError::AmbiguousSourceFile {
            pattern: "/data/Prec/prec_*_201001.nc".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "pattern must match exactly 1 file, got 2: /data/Prec/prec_*_201001.nc"
        );
    }

    #[test]
    fn display_unknown_precip_units() {
        let err = ProductError::UnknownPrecipUnits {
            units: "inches".to_string(),
            var: "prec".to_string(),
            path: PathBuf::from("/d/prec.nc"),
        };
        assert_eq!(
            err.to_string(),
            "unknown precipitation units 'inches' for 'prec' in /d/prec.nc"
        );
    }

    #[test]
    fn display_unsupported_product() {
        let err = ProductError::UnsupportedProduct {
            name: "MERRA2".to_string(),
        };
        assert!(err.to_string().contains("'MERRA2'"));
    }

    #[test]
    fn display_lookahead() {
        let err = ProductError::LookaheadBeyondAxis {
            path: PathBuf::from("/era5/20000101.nc"),
            index: 23,
            len: 24,
        };
        assert_eq!(
            err.to_string(),
            "need lookahead beyond time axis of /era5/20000101.nc: index 23, length 24"
        );
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err: ProductError = TimeError::EmptyAxis.into();
        assert_eq!(err.to_string(), "time axis is empty");
        let err: ProductError = GridError::EmptyCoordinate { name: "lon" }.into();
        assert_eq!(err.to_string(), "coordinate 'lon' is empty");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ProductError>();
    }
}
