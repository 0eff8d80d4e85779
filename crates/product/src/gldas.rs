//! GLDAS: one file per 3-hour step holding every variable.

use forcmatch_grid::{DEFAULT_MAX_REMAP_RADIUS, GridAxes, GridCellIndex, remap_search};
use forcmatch_io::{CellValue, GridFile, IoError, Station};
use forcmatch_quantize::{CanonicalSample, RawSample};
use forcmatch_time::ForcingClock;
use tracing::{debug, info};

use crate::adapter::require_value;
use crate::config::ForcingSourceConfig;
use crate::error::ProductError;
use crate::layout::gldas_step_file;
use crate::physics::{kelvin_to_celsius, rh_from_specific_humidity};
use crate::units::{PrecipUnit, resolve_precip_unit};

/// Minutes between GLDAS steps.
pub const GLDAS_STEP_MIN: i64 = 180;

/// Raw GLDAS values of one station at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GldasStep {
    pub precip: f64,
    pub temp_k: f64,
    pub shum_kg_kg: f64,
    pub pres_pa: f64,
    pub wind_m_s: f64,
    pub srad_w_m2: f64,
}

impl GldasStep {
    /// Convert with a precipitation unit already resolved for the file.
    pub fn to_raw_sample(&self, precip_unit: PrecipUnit) -> RawSample {
        RawSample {
            precip_mm_day: self.precip * precip_unit.mm_day_factor(),
            temp_c: kelvin_to_celsius(self.temp_k),
            rh: rh_from_specific_humidity(self.pres_pa, self.shum_kg_kg, self.temp_k),
            wind_m_s: self.wind_m_s.abs(),
            net_radiation_w_m2: self.srad_w_m2,
        }
    }
}

/// A station's grid cell after the validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationCell {
    /// Nearest cell by coordinate.
    pub nearest: GridCellIndex,
    /// Cell actually read; differs from `nearest` after a remap.
    pub cell: GridCellIndex,
}

impl StationCell {
    pub fn remapped(&self) -> bool {
        self.nearest != self.cell
    }
}

/// Nearest cell of `station` whose temperature at time index 0 of `file`
/// holds data, searching outward when the nearest cell is masked.
///
/// # Errors
///
/// [`IoError::MissingVariable`] (wrapped) if the temperature variable is
/// absent; [`forcmatch_grid::GridError::NoValidGridCellFound`] (wrapped)
/// when the search is exhausted.
pub fn locate_valid_cell(
    file: &GridFile,
    axes: &GridAxes,
    source: &ForcingSourceConfig,
    station: &Station,
) -> Result<StationCell, ProductError> {
    let temp_var = source.variable("TEMP")?;
    if !file.has_variable(temp_var) {
        return Err(IoError::MissingVariable {
            name: temp_var.to_string(),
            path: file.path().to_path_buf(),
        }
        .into());
    }
    let dims = source.dimensions();
    let is_valid = |cell: GridCellIndex| {
        matches!(file.read_point(temp_var, dims, 0, cell), Ok(CellValue::Value(_)))
    };

    let (lon, lat) = (station.longitude_deg, station.latitude_deg);
    let nearest = axes.locate(lon, lat);
    if is_valid(nearest) {
        return Ok(StationCell {
            nearest,
            cell: nearest,
        });
    }
    let cell = remap_search(axes, lon, lat, nearest, DEFAULT_MAX_REMAP_RADIUS, is_valid)?;
    debug!(
        station = station.index,
        from_lat = nearest.lat_index,
        from_lon = nearest.lon_index,
        to_lat = cell.lat_index,
        to_lon = cell.lon_index,
        "remapped station off a masked cell"
    );
    Ok(StationCell { nearest, cell })
}

/// Point queries against GLDAS.
///
/// The query time is floored onto the 3-hour grid; the step's file is read
/// at time index 0 and also serves as the validity reference for the
/// station's cell.
#[derive(Debug, Clone)]
pub struct GldasAdapter {
    source: ForcingSourceConfig,
    clock: ForcingClock,
}

impl GldasAdapter {
    pub fn new(source: ForcingSourceConfig, clock: ForcingClock) -> Self {
        Self { source, clock }
    }

    pub fn source(&self) -> &ForcingSourceConfig {
        &self.source
    }

    /// Canonical sample of the 3-hour step containing `t_min`.
    pub fn resolve_sample(&self, station: &Station, t_min: f64) -> Result<CanonicalSample, ProductError> {
        let step = self.clock.floor_to_step(t_min, GLDAS_STEP_MIN);
        let path = gldas_step_file(&self.source, step);
        let file = GridFile::open(&path)?;
        let axes = file.grid_axes(self.source.dimensions())?;
        let located = locate_valid_cell(&file, &axes, &self.source, station)?;
        if located.remapped() {
            info!(
                station = station.index,
                path = %path.display(),
                "station remapped to nearest valid GLDAS cell"
            );
        }

        let read = |key: &str| require_value(&file, &self.source, key, 0, located.cell);
        let values = GldasStep {
            precip: read("PREC")?,
            temp_k: read("TEMP")?,
            shum_kg_kg: read("SHUM")?,
            pres_pa: read("PRES")?,
            wind_m_s: read("WIND")?,
            srad_w_m2: read("SRAD")?,
        };
        let unit = gldas_precip_unit(&file, &self.source)?;
        Ok(values.to_raw_sample(unit).quantize())
    }
}

/// Precipitation unit of a GLDAS file, detected from its `units` attribute.
pub fn gldas_precip_unit(file: &GridFile, source: &ForcingSourceConfig) -> Result<PrecipUnit, ProductError> {
    let var = source.variable("PREC")?;
    resolve_precip_unit(
        None,
        PrecipUnit::detect_gldas,
        file.units(var)?.as_deref(),
        var,
        file.path(),
    )
}
