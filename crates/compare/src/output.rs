//! Sampled comparison of legacy binary model output against a NetCDF
//! output variable.

use std::path::PathBuf;

use forcmatch_io::{GridFile, IoError, LegacyBinary, find_time_index};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CompareError;
use crate::forcing::absolute;
use crate::summary::OutputSummary;

/// Records sampled when no times are requested.
pub const DEFAULT_RECORD_COUNT: usize = 2;

/// Column ids sampled when no indices are requested.
pub const DEFAULT_COLUMN_COUNT: usize = 3;

/// Default tolerance, in minutes, for matching a requested time to a record.
pub const DEFAULT_OUTPUT_TIME_TOLERANCE_MIN: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OutputCompareRequest {
    legacy_bin: PathBuf,
    netcdf: PathBuf,
    var: String,
    time_dim: String,
    obj_dim: Option<String>,
    times_min: Option<Vec<f64>>,
    indices: Option<Vec<i64>>,
    time_tolerance_min: f64,
}

impl OutputCompareRequest {
    pub fn new(legacy_bin: impl Into<PathBuf>, netcdf: impl Into<PathBuf>, var: impl Into<String>) -> Self {
        Self {
            legacy_bin: legacy_bin.into(),
            netcdf: netcdf.into(),
            var: var.into(),
            time_dim: "time".to_string(),
            obj_dim: None,
            times_min: None,
            indices: None,
            time_tolerance_min: DEFAULT_OUTPUT_TIME_TOLERANCE_MIN,
        }
    }

    pub fn with_time_dim(mut self, dim: impl Into<String>) -> Self {
        self.time_dim = dim.into();
        self
    }

    /// Object dimension; inferred from the variable when unset.
    pub fn with_obj_dim(mut self, dim: Option<String>) -> Self {
        self.obj_dim = dim;
        self
    }

    /// Sample times in minutes; the first records when unset.
    pub fn with_times_min(mut self, times: Option<Vec<f64>>) -> Self {
        self.times_min = times;
        self
    }

    /// 1-based object indices; the first column ids when unset.
    pub fn with_indices(mut self, indices: Option<Vec<i64>>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_time_tolerance(mut self, minutes: f64) -> Self {
        self.time_tolerance_min = minutes;
        self
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        if self.var.trim().is_empty() || self.time_dim.trim().is_empty() {
            return Err(CompareError::InvalidRequest {
                reason: "variable and time dimension names must not be empty".to_string(),
            });
        }
        if !self.time_tolerance_min.is_finite() || self.time_tolerance_min < 0.0 {
            return Err(CompareError::InvalidRequest {
                reason: format!(
                    "time tolerance must be finite and >= 0, got {}",
                    self.time_tolerance_min
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSample {
    /// Time of the matched legacy record.
    pub t_min: f64,
    pub index_1based: i64,
    pub legacy: f64,
    pub netcdf: f64,
    /// `legacy - netcdf`.
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputReport {
    pub legacy_bin: PathBuf,
    pub netcdf: PathBuf,
    pub var: String,
    pub time_dim: String,
    pub obj_dim: String,
    pub samples: Vec<OutputSample>,
    pub summary: OutputSummary,
}

/// The single dimension of `dims` other than `time_dim`, if there is
/// exactly one.
pub fn infer_object_dimension<'a>(dims: &'a [String], time_dim: &str) -> Option<&'a str> {
    let mut others = dims.iter().filter(|d| *d != time_dim);
    match (others.next(), others.next()) {
        (Some(only), None) => Some(only.as_str()),
        _ => None,
    }
}

/// Compare legacy output against NetCDF at each requested time and index.
///
/// Each time is matched to the nearest legacy record within the
/// tolerance; that record's position is also the NetCDF time index.
/// Indices without a legacy column are skipped.
///
/// # Errors
///
/// [`IoError::TimeNotFound`] (wrapped) for an unmatched time;
/// [`CompareError::AmbiguousObjectDimension`] when the object dimension
/// cannot be inferred; [`IoError::MissingDimension`] (wrapped) when the
/// variable lacks the time or object dimension.
pub fn compare_output(request: &OutputCompareRequest) -> Result<OutputReport, CompareError> {
    request.validate()?;
    let legacy_path = absolute(&request.legacy_bin)?;
    let nc_path = absolute(&request.netcdf)?;

    let legacy = LegacyBinary::read(&legacy_path)?;
    let times = match &request.times_min {
        Some(times) => times.clone(),
        None => legacy.times_min.iter().take(DEFAULT_RECORD_COUNT).copied().collect(),
    };
    let indices = match &request.indices {
        Some(indices) => indices.clone(),
        None => legacy.column_ids.iter().take(DEFAULT_COLUMN_COUNT).copied().collect(),
    };

    let file = GridFile::open(&nc_path)?;
    let dims = file.dimension_names(&request.var)?;
    let obj_dim = match &request.obj_dim {
        Some(dim) => dim.clone(),
        None => infer_object_dimension(&dims, &request.time_dim)
            .map(str::to_string)
            .ok_or_else(|| CompareError::AmbiguousObjectDimension {
                var: request.var.clone(),
                dims: dims.clone(),
                path: nc_path.clone(),
            })?,
    };
    for dim in [&request.time_dim, &obj_dim] {
        if !dims.contains(dim) {
            return Err(IoError::MissingDimension {
                var: request.var.clone(),
                dim: dim.clone(),
                path: nc_path.clone(),
            }
            .into());
        }
    }
    info!(
        var = %request.var,
        obj_dim = %obj_dim,
        times = times.len(),
        indices = indices.len(),
        "comparing legacy output against NetCDF"
    );

    let columns = legacy.column_index();
    let mut samples = Vec::with_capacity(times.len() * indices.len());
    for &t in &times {
        let ti = find_time_index(&legacy.times_min, t, request.time_tolerance_min)?;
        for &index_1based in &indices {
            let Some(&col) = columns.get(&index_1based) else {
                debug!(index_1based, "index not in legacy output columns; skipped");
                continue;
            };
            let obj = usize::try_from(index_1based - 1)
                .map_err(|_| CompareError::InvalidIndex { index: index_1based })?;
            let legacy_value = legacy.values[ti][col];
            let named = [(request.time_dim.as_str(), ti), (obj_dim.as_str(), obj)];
            let netcdf = file.require_at(&request.var, &named)?;
            samples.push(OutputSample {
                t_min: legacy.times_min[ti],
                index_1based,
                legacy: legacy_value,
                netcdf,
                diff: legacy_value - netcdf,
            });
        }
    }

    let diffs: Vec<f64> = samples.iter().map(|s| s.diff).collect();
    Ok(OutputReport {
        legacy_bin: legacy_path,
        netcdf: nc_path,
        var: request.var.clone(),
        time_dim: request.time_dim.clone(),
        obj_dim,
        summary: OutputSummary::of(&diffs),
        samples,
    })
}
