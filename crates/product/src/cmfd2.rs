//! CMFD2: monthly per-variable files of instantaneous fields.

use std::path::PathBuf;

use forcmatch_io::{GridFile, Station};
use forcmatch_quantize::{CanonicalSample, RawSample};
use forcmatch_time::ForcingClock;
use tracing::debug;

use crate::adapter::require_value;
use crate::config::{ForcingSourceConfig, QueryOptions};
use crate::error::ProductError;
use crate::layout::cmfd2_file;
use crate::physics::{kelvin_to_celsius, rh_from_specific_humidity};
use crate::units::{PrecipUnit, resolve_precip_unit};

/// Point queries against CMFD2.
///
/// The grid and the time axis come from the precipitation file. The other
/// five files are read at the same indices; their own axes are not checked.
#[derive(Debug, Clone)]
pub struct Cmfd2Adapter {
    source: ForcingSourceConfig,
    clock: ForcingClock,
    options: QueryOptions,
}

/// The six monthly files of one query, resolved before any is opened.
struct MonthFiles {
    prec: PathBuf,
    temp: PathBuf,
    shum: PathBuf,
    srad: PathBuf,
    wind: PathBuf,
    pres: PathBuf,
}

impl Cmfd2Adapter {
    pub fn new(source: ForcingSourceConfig, clock: ForcingClock, options: QueryOptions) -> Self {
        Self {
            source,
            clock,
            options,
        }
    }

    pub fn source(&self) -> &ForcingSourceConfig {
        &self.source
    }

    /// Canonical sample in force at `t_min` minutes after the forcing start.
    ///
    /// # Errors
    ///
    /// [`ProductError::AmbiguousSourceFile`] if any variable's pattern does
    /// not match exactly one file; time-axis, read and unit errors otherwise.
    pub fn resolve_sample(&self, station: &Station, t_min: f64) -> Result<CanonicalSample, ProductError> {
        let instant = self.clock.at(t_min);
        let files = MonthFiles {
            prec: cmfd2_file(&self.source, "PREC", instant)?,
            temp: cmfd2_file(&self.source, "TEMP", instant)?,
            shum: cmfd2_file(&self.source, "SHUM", instant)?,
            srad: cmfd2_file(&self.source, "SRAD", instant)?,
            wind: cmfd2_file(&self.source, "WIND", instant)?,
            pres: cmfd2_file(&self.source, "PRES", instant)?,
        };
        let dims = self.source.dimensions();

        let (precip_mm_day, time_index, cell) = {
            let grid = GridFile::open(&files.prec)?;
            let axes = grid.grid_axes(dims)?;
            let cell = axes.locate(station.longitude_deg, station.latitude_deg);
            let axis = grid.time_axis(&dims.time_var, self.clock.start())?;
            let time_index = axis.index_at(
                t_min,
                self.options.time_tolerance_min(),
                self.options.clamp(),
            )?;

            let var = self.source.variable("PREC")?;
            let raw = require_value(&grid, &self.source, "PREC", time_index, cell)?;
            let unit = resolve_precip_unit(
                self.source.precip_units(),
                PrecipUnit::detect_cmfd2,
                grid.units(var)?.as_deref(),
                var,
                grid.path(),
            )?;
            (raw * unit.mm_day_factor(), time_index, cell)
        };
        debug!(
            station = station.index,
            t_min,
            time_index,
            lat_index = cell.lat_index,
            lon_index = cell.lon_index,
            "CMFD2 indices"
        );

        let read = |path: &PathBuf, key: &str| -> Result<f64, ProductError> {
            let file = GridFile::open(path)?;
            require_value(&file, &self.source, key, time_index, cell)
        };
        let temp_k = read(&files.temp, "TEMP")?;
        let shum = read(&files.shum, "SHUM")?;
        let srad = read(&files.srad, "SRAD")?;
        let wind = read(&files.wind, "WIND")?;
        let pres = read(&files.pres, "PRES")?;

        Ok(RawSample {
            precip_mm_day,
            temp_c: kelvin_to_celsius(temp_k),
            rh: rh_from_specific_humidity(pres, shum, temp_k),
            wind_m_s: wind.abs(),
            net_radiation_w_m2: srad,
        }
        .quantize())
    }
}
