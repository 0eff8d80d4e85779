//! Error types for the forcmatch-batch crate.

use std::path::PathBuf;

use forcmatch_grid::GridError;
use forcmatch_io::IoError;
use forcmatch_product::{Product, ProductError};
use forcmatch_time::TimeError;

/// Error type for batch forcing generation.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Returned when batch generation is asked of a product without a
    /// native output step.
    #[error("batch generation is not supported for {product}")]
    UnsupportedProduct {
        /// The configured product.
        product: Product,
    },

    /// Returned when the roster holds no stations.
    #[error("station roster is empty")]
    EmptyRoster,

    /// Returned when the simulation interval is not usable.
    #[error("invalid simulation interval: start {start_min} min, end {end_min} min")]
    InvalidInterval {
        /// Start of the interval in minutes.
        start_min: f64,
        /// End of the interval in minutes.
        end_min: f64,
    },

    /// Returned when a day file holds fewer steps than the run needs.
    #[error("{} has {available} time steps, need step {needed}", path.display())]
    ShortFile {
        /// The file.
        path: PathBuf,
        /// Steps held by the file.
        available: usize,
        /// 0-based step that was needed.
        needed: usize,
    },

    /// Returned when a slab was not loaded for a requested variable.
    #[error("no slab for '{var}' loaded from {}", path.display())]
    SlabNotLoaded {
        /// Variable name.
        var: String,
        /// File the slabs came from.
        path: PathBuf,
    },

    /// Wraps a product configuration or conversion error.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Wraps a file read or write error.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Wraps a spatial lookup fault.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Wraps a forcing-clock fault.
    #[error(transparent)]
    Time(#[from] TimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsupported_product() {
        let err = BatchError::UnsupportedProduct {
            product: Product::Cmfd2,
        };
        assert_eq!(err.to_string(), "batch generation is not supported for CMFD2");
    }

    #[test]
    fn display_short_file() {
        let err = BatchError::ShortFile {
            path: PathBuf::from("/era5/ERA5_20000101.nc"),
            available: 12,
            needed: 12,
        };
        assert_eq!(
            err.to_string(),
            "/era5/ERA5_20000101.nc has 12 time steps, need step 12"
        );
    }

    #[test]
    fn display_invalid_interval() {
        let err = BatchError::InvalidInterval {
            start_min: 10.0,
            end_min: -1.0,
        };
        assert!(err.to_string().contains("end -1 min"));
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err: BatchError = IoError::FileNotFound {
            path: PathBuf::from("/x.nc"),
        }
        .into();
        assert!(err.to_string().contains("/x.nc"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<BatchError>();
    }
}
