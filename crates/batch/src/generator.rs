//! Whole-interval forcing generation for ERA5 and GLDAS.

use std::path::Path;

use forcmatch_grid::GridCellIndex;
use forcmatch_io::{GridFile, Station, StationRoster, write_station_csv};
use forcmatch_product::{
    Era5Hour, ForcingSourceConfig, GLDAS_STEP_MIN, GldasStep, PrecipUnit, Product, ProductError,
    era5_day_file, gldas_step_file, locate_valid_cell,
};
use forcmatch_quantize::CanonicalSample;
use forcmatch_time::ForcingClock;
use tracing::{debug, info};

use crate::cache::{FileSlabs, SlabCache, TimeSelection};
use crate::error::BatchError;
use crate::plan::{OutputSteps, SimInterval};
use crate::stations::StationCells;

/// ERA5 batch output is always converted over a one-hour interval.
const ERA5_DT_SECONDS: f64 = 3600.0;

const MINUTES_PER_DAY: f64 = 1440.0;

// ---------------------------------------------------------------------------
// StationSeries
// ---------------------------------------------------------------------------

/// The generated rows of one station, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    pub station: Station,
    pub rows: Vec<(f64, CanonicalSample)>,
}

/// Write every series as a legacy station CSV under `out_dir`.
pub fn write_station_series(
    out_dir: &Path,
    clock: &ForcingClock,
    series: &[StationSeries],
) -> Result<(), BatchError> {
    info!(
        stations = series.len(),
        steps = series.first().map_or(0, |s| s.rows.len()),
        out_dir = %out_dir.display(),
        "writing station forcing CSV"
    );
    for s in series {
        write_station_csv(&out_dir.join(&s.station.filename), clock, &s.rows)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// BatchForcingGenerator
// ---------------------------------------------------------------------------

/// Drives a product over a whole simulation interval at its native step
/// for every station.
///
/// Each source file is opened once; only the bounding box covering all
/// stations is read, and every station is served from that slab.
///
/// # Example
///
/// ```ignore
/// let roster = StationRoster::read(&run.join("input/prj/prj.tsd.forc"))?;
/// let mut generator = BatchForcingGenerator::from_roster(source, &roster)?;
/// let series = generator.generate(&SimInterval::from_para(&para)?)?;
/// write_station_series(&roster.output_dir(&run), generator.clock(), &series)?;
/// ```
#[derive(Debug)]
pub struct BatchForcingGenerator {
    source: ForcingSourceConfig,
    clock: ForcingClock,
    stations: Vec<Station>,
    cache: SlabCache,
}

impl BatchForcingGenerator {
    /// # Errors
    ///
    /// [`BatchError::UnsupportedProduct`] for CMFD2;
    /// [`BatchError::EmptyRoster`] without stations.
    pub fn new(
        source: ForcingSourceConfig,
        clock: ForcingClock,
        stations: Vec<Station>,
    ) -> Result<Self, BatchError> {
        let product = source.product();
        if product.native_step_min().is_none() {
            return Err(BatchError::UnsupportedProduct { product });
        }
        if stations.is_empty() {
            return Err(BatchError::EmptyRoster);
        }
        Ok(Self {
            source,
            clock,
            stations,
            cache: SlabCache::new(),
        })
    }

    /// Generator over every station of a roster, clocked from its forcing
    /// start date.
    pub fn from_roster(source: ForcingSourceConfig, roster: &StationRoster) -> Result<Self, BatchError> {
        let clock = ForcingClock::from_yyyymmdd(roster.forcing_start_yyyymmdd)?;
        Self::new(source, clock, roster.stations.clone())
    }

    pub fn clock(&self) -> &ForcingClock {
        &self.clock
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// One series per station, in roster order, starting at the forcing
    /// start and covering `interval.end_min`.
    pub fn generate(&mut self, interval: &SimInterval) -> Result<Vec<StationSeries>, BatchError> {
        let product = self.source.product();
        let step_min = product
            .native_step_min()
            .ok_or(BatchError::UnsupportedProduct { product })?;
        let steps = OutputSteps::covering(interval, step_min);
        info!(
            %product,
            stations = self.stations.len(),
            steps = steps.len(),
            step_min,
            "generating station forcing"
        );

        let samples = match product {
            Product::Era5 => self.generate_era5(&steps)?,
            Product::Gldas => self.generate_gldas(interval, &steps)?,
            Product::Cmfd2 => return Err(BatchError::UnsupportedProduct { product }),
        };

        Ok(self
            .stations
            .iter()
            .zip(samples)
            .map(|(station, values)| StationSeries {
                station: station.clone(),
                rows: steps.times_min().zip(values).collect(),
            })
            .collect())
    }

    // -- ERA5 ---------------------------------------------------------------

    fn generate_era5(&mut self, steps: &OutputSteps) -> Result<Vec<Vec<CanonicalSample>>, BatchError> {
        let Self {
            source,
            clock,
            stations,
            cache,
        } = self;
        let dims = source.dimensions();

        // Step k needs accumulator readings at k and k + 1.
        let n_bound = steps.len() + 1;
        let last_bound_min = steps.time_min(steps.len());
        let max_day = (last_bound_min / MINUTES_PER_DAY).floor() as usize;

        let cells = {
            let file = GridFile::open(&era5_day_file(source, clock.start()))?;
            let axes = file.grid_axes(dims)?;
            let cells: Vec<GridCellIndex> = stations
                .iter()
                .map(|s| axes.locate(s.longitude_deg, s.latitude_deg))
                .collect();
            StationCells::new(cells)?
        };

        let vars = [
            source.variable("TP")?,
            source.variable("SSR")?,
            source.variable("T2M")?,
            source.variable("D2M")?,
            source.variable("U10")?,
            source.variable("V10")?,
        ];
        let mut readings: Vec<Vec<[f64; 6]>> = vec![Vec::with_capacity(n_bound); stations.len()];

        for day in 0..=max_day {
            let path = era5_day_file(source, clock.at(day as f64 * MINUTES_PER_DAY));
            let slabs = cache.load(&path, &vars, dims, &TimeSelection::All, cells.bbox())?;
            for h in 0..24 {
                let k = day * 24 + h;
                if k >= n_bound {
                    break;
                }
                if h >= slabs.time_len() {
                    return Err(BatchError::ShortFile {
                        path: path.clone(),
                        available: slabs.time_len(),
                        needed: h,
                    });
                }
                for (i, station_readings) in readings.iter_mut().enumerate() {
                    station_readings.push(read_station(slabs, &vars, h, cells.offset(i))?);
                }
            }
            debug!(day, path = %path.display(), "ERA5 day read");
            cache.evict(&path);
        }

        Ok(readings
            .iter()
            .map(|r| {
                (0..steps.len())
                    .map(|k| {
                        let [tp0_m, ssr0_j_m2, t2m_k, d2m_k, u10, v10] = r[k];
                        let [tp1_m, ssr1_j_m2, ..] = r[k + 1];
                        Era5Hour {
                            tp0_m,
                            tp1_m,
                            ssr0_j_m2,
                            ssr1_j_m2,
                            t2m_k,
                            d2m_k,
                            u10,
                            v10,
                        }
                        .to_raw_sample(ERA5_DT_SECONDS)
                        .quantize()
                    })
                    .collect()
            })
            .collect())
    }

    // -- GLDAS --------------------------------------------------------------

    fn generate_gldas(
        &mut self,
        interval: &SimInterval,
        steps: &OutputSteps,
    ) -> Result<Vec<Vec<CanonicalSample>>, BatchError> {
        let Self {
            source,
            clock,
            stations,
            cache,
        } = self;
        let dims = source.dimensions();

        // Cells are validated once, against the first simulated step.
        let reference = gldas_step_file(source, clock.floor_to_step(interval.start_min, GLDAS_STEP_MIN));
        let cells = {
            let file = GridFile::open(&reference)?;
            let axes = file.grid_axes(dims)?;
            let mut cells = Vec::with_capacity(stations.len());
            let mut remapped = 0usize;
            for station in stations.iter() {
                let located = locate_valid_cell(&file, &axes, source, station)?;
                if located.remapped() {
                    remapped += 1;
                }
                cells.push(located.cell);
            }
            if remapped > 0 {
                info!(
                    remapped,
                    stations = stations.len(),
                    reference = %reference.display(),
                    "GLDAS remap: stations moved off masked grid cells"
                );
            }
            StationCells::new(cells)?
        };

        let prec_var = source.variable("PREC")?;
        let vars = [
            prec_var,
            source.variable("TEMP")?,
            source.variable("SHUM")?,
            source.variable("PRES")?,
            source.variable("WIND")?,
            source.variable("SRAD")?,
        ];
        let mut out: Vec<Vec<CanonicalSample>> = vec![Vec::with_capacity(steps.len()); stations.len()];

        for k in 0..steps.len() {
            let step = clock.floor_to_step(steps.time_min(k), GLDAS_STEP_MIN);
            let path = gldas_step_file(source, step);
            let slabs = cache.load(&path, &vars, dims, &TimeSelection::Range(0..1), cells.bbox())?;
            let unit = slab_precip_unit(slabs, prec_var)?;
            for (i, series) in out.iter_mut().enumerate() {
                let [precip, temp_k, shum_kg_kg, pres_pa, wind_m_s, srad_w_m2] =
                    read_station(slabs, &vars, 0, cells.offset(i))?;
                let values = GldasStep {
                    precip,
                    temp_k,
                    shum_kg_kg,
                    pres_pa,
                    wind_m_s,
                    srad_w_m2,
                };
                series.push(values.to_raw_sample(unit).quantize());
            }
            cache.evict(&path);
        }
        Ok(out)
    }
}

/// The six variables of one station at time offset `t`, in `vars` order.
fn read_station(
    slabs: &FileSlabs,
    vars: &[&str; 6],
    t: usize,
    (lat_off, lon_off): (usize, usize),
) -> Result<[f64; 6], BatchError> {
    let mut values = [0.0; 6];
    for (value, var) in values.iter_mut().zip(vars) {
        *value = slabs.slab(var)?.require(t, lat_off, lon_off)?;
    }
    Ok(values)
}

fn slab_precip_unit(slabs: &FileSlabs, var: &str) -> Result<PrecipUnit, BatchError> {
    let units = slabs.units(var).unwrap_or("");
    PrecipUnit::detect_gldas(units).ok_or_else(|| {
        BatchError::Product(ProductError::UnknownPrecipUnits {
            units: units.to_string(),
            var: var.to_string(),
            path: slabs.path().to_path_buf(),
        })
    })
}
