//! Comparison error types.

use std::path::PathBuf;

use forcmatch_io::IoError;
use forcmatch_product::ProductError;
use forcmatch_time::TimeError;

/// Errors that can occur while sampling or reporting a comparison.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// The request itself is unusable.
    #[error("invalid comparison request: {reason}")]
    InvalidRequest { reason: String },

    /// An output column id that cannot address a NetCDF object index.
    #[error("column id {index} cannot be mapped to a 0-based object index")]
    InvalidIndex { index: i64 },

    /// The object dimension was not given and could not be inferred.
    #[error(
        "cannot infer the object dimension of '{var}' from dims {dims:?} in {}; name it explicitly",
        path.display()
    )]
    AmbiguousObjectDimension {
        var: String,
        dims: Vec<String>,
        path: PathBuf,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Filesystem failure outside the forcing readers (report output, path
    /// resolution).
    #[error("i/o error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Time(#[from] TimeError),
}

impl CompareError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
