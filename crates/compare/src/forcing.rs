//! Sampled comparison of baseline station CSV forcing against NetCDF
//! point queries.

use std::path::{Path, PathBuf};

use forcmatch_io::{KvConfig, RunDir, Station, StationCsv, StationRoster};
use forcmatch_product::{ForcingSourceConfig, ProductAdapter, QueryOptions};
use forcmatch_quantize::ForcingVariable;
use forcmatch_time::ForcingClock;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CompareError;
use crate::summary::VariableSummary;
use crate::variables::{PerVariable, difference};

/// Default 0-based station indices.
pub const DEFAULT_STATIONS: [usize; 3] = [0, 1, 2];

/// Default sample times, minutes since the forcing start.
pub const DEFAULT_TIMES_MIN: [f64; 2] = [0.0, 180.0];

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Which run directories, stations and times to compare.
///
/// The roster and station CSVs come from `baseline_run`; the forcing
/// configuration (`<prj>.cfg.forcing`) comes from `nc_run`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingCompareRequest {
    baseline_run: PathBuf,
    nc_run: PathBuf,
    prj: String,
    stations: Vec<usize>,
    times_min: Vec<f64>,
    options: QueryOptions,
}

impl ForcingCompareRequest {
    pub fn new(baseline_run: impl Into<PathBuf>, nc_run: impl Into<PathBuf>, prj: impl Into<String>) -> Self {
        Self {
            baseline_run: baseline_run.into(),
            nc_run: nc_run.into(),
            prj: prj.into(),
            stations: DEFAULT_STATIONS.to_vec(),
            times_min: DEFAULT_TIMES_MIN.to_vec(),
            options: QueryOptions::default(),
        }
    }

    pub fn with_stations(mut self, stations: Vec<usize>) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_times_min(mut self, times_min: Vec<f64>) -> Self {
        self.times_min = times_min;
        self
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn stations(&self) -> &[usize] {
        &self.stations
    }

    pub fn times_min(&self) -> &[f64] {
        &self.times_min
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        if self.prj.trim().is_empty() {
            return Err(CompareError::InvalidRequest {
                reason: "project name must not be empty".to_string(),
            });
        }
        if let Some(t) = self.times_min.iter().find(|t| !t.is_finite()) {
            return Err(CompareError::InvalidRequest {
                reason: format!("sample time {t} is not finite"),
            });
        }
        let tol = self.options.time_tolerance_min();
        if !tol.is_finite() || tol < 0.0 {
            return Err(CompareError::InvalidRequest {
                reason: format!("time tolerance must be finite and >= 0, got {tol}"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One `(station, time)` sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForcingSample {
    pub station_idx0: usize,
    pub t_min: f64,
    pub station_lon_deg: f64,
    pub station_lat_deg: f64,
    pub baseline: PerVariable<f64>,
    pub nc: PerVariable<f64>,
    /// `baseline - nc`.
    pub diff: PerVariable<f64>,
}

impl ForcingSample {
    pub fn new(station: &Station, t_min: f64, baseline: PerVariable<f64>, nc: PerVariable<f64>) -> Self {
        Self {
            station_idx0: station.index,
            t_min,
            station_lon_deg: station.longitude_deg,
            station_lat_deg: station.latitude_deg,
            diff: difference(&baseline, &nc),
            baseline,
            nc,
        }
    }
}

/// Result of [`compare_forcing`]; serializes to the JSON report layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForcingReport {
    pub baseline_run: PathBuf,
    pub nc_run: PathBuf,
    pub prj: String,
    pub forc_start_yyyymmdd: u32,
    pub stations_idx0: Vec<usize>,
    pub times_min: Vec<f64>,
    pub summary: PerVariable<VariableSummary>,
    pub samples: Vec<ForcingSample>,
}

impl ForcingReport {
    /// Summarise the samples' differences per variable.
    pub fn summarize(samples: &[ForcingSample]) -> PerVariable<VariableSummary> {
        PerVariable::from_fn(|v| {
            let diffs: Vec<f64> = samples.iter().map(|s| *s.diff.get(v)).collect();
            VariableSummary::of(&diffs)
        })
    }

    /// Variables whose `max_abs` exceeds `threshold`, in column order.
    pub fn exceeding(&self, threshold: f64) -> Vec<(ForcingVariable, f64)> {
        self.summary
            .iter()
            .filter(|(_, s)| s.max_abs > threshold)
            .map(|(v, s)| (v, s.max_abs))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// compare_forcing
// ---------------------------------------------------------------------------

/// Sample every requested station at every requested time, stations
/// outermost.
///
/// Baseline values are the CSV row in force at each time; NetCDF values
/// come from a point query through the configured product.
///
/// # Errors
///
/// Any read, configuration or point-query failure aborts the comparison;
/// a station index past the roster is [`forcmatch_io::IoError::Config`].
pub fn compare_forcing(request: &ForcingCompareRequest) -> Result<ForcingReport, CompareError> {
    request.validate()?;
    let baseline_run = absolute(&request.baseline_run)?;
    let nc_run = absolute(&request.nc_run)?;
    let baseline = RunDir::new(&baseline_run, &request.prj);
    let nc = RunDir::new(&nc_run, &request.prj);

    let roster = StationRoster::read(&baseline.roster())?;
    let kv = KvConfig::read(&nc.forcing_config())?;
    let source = ForcingSourceConfig::from_kv(&kv, &nc_run)?;
    let clock = ForcingClock::from_yyyymmdd(roster.forcing_start_yyyymmdd)?;
    info!(
        product = %source.product(),
        stations = request.stations.len(),
        times = request.times_min.len(),
        "comparing baseline forcing against NetCDF"
    );
    let adapter = ProductAdapter::new(source, clock, request.options);

    let mut samples = Vec::with_capacity(request.stations.len() * request.times_min.len());
    for &idx in &request.stations {
        let station = roster.station(idx)?;
        let csv = StationCsv::read(&roster.station_csv_path(&baseline_run, station))?;
        for &t_min in &request.times_min {
            let base = PerVariable::from(csv.value_at(t_min));
            let grid = PerVariable::from(adapter.resolve_sample(station, t_min)?);
            let sample = ForcingSample::new(station, t_min, base, grid);
            debug!(station = idx, t_min, diff = ?sample.diff, "forcing sample");
            samples.push(sample);
        }
    }

    Ok(ForcingReport {
        baseline_run,
        nc_run,
        prj: request.prj.clone(),
        forc_start_yyyymmdd: roster.forcing_start_yyyymmdd,
        stations_idx0: request.stations.clone(),
        times_min: request.times_min.clone(),
        summary: ForcingReport::summarize(&samples),
        samples,
    })
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf, CompareError> {
    std::path::absolute(path).map_err(|e| CompareError::file(path, e))
}
