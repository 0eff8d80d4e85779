//! Product dispatch for point queries.

use forcmatch_grid::GridCellIndex;
use forcmatch_io::{GridFile, Station};
use forcmatch_quantize::CanonicalSample;
use forcmatch_time::ForcingClock;

use crate::cmfd2::Cmfd2Adapter;
use crate::config::{ForcingSourceConfig, Product, QueryOptions};
use crate::era5::Era5Adapter;
use crate::error::ProductError;
use crate::gldas::GldasAdapter;

/// Decoded value of the variable configured under `key`, which must hold data.
pub(crate) fn require_value(
    file: &GridFile,
    source: &ForcingSourceConfig,
    key: &str,
    time_index: usize,
    cell: GridCellIndex,
) -> Result<f64, ProductError> {
    let var = source.variable(key)?;
    Ok(file.require_point(var, source.dimensions(), time_index, cell)?)
}

/// A point-query adapter for whichever product the configuration names.
///
/// # Example
///
/// ```no_run
/// use forcmatch_io::Station;
/// use forcmatch_product::{ForcingSourceConfig, Product, ProductAdapter, QueryOptions};
/// use forcmatch_time::ForcingClock;
///
/// let source = ForcingSourceConfig::new(Product::Era5, "/data/era5", "ERA5_{yyyymmdd}.nc")
///     .with_variable("TP", "tp")
///     .with_variable("T2M", "t2m")
///     .with_variable("D2M", "d2m")
///     .with_variable("U10", "u10")
///     .with_variable("V10", "v10")
///     .with_variable("SSR", "ssr");
/// let clock = ForcingClock::from_yyyymmdd(20000101).unwrap();
/// let adapter = ProductAdapter::new(source, clock, QueryOptions::default());
/// let station = Station {
///     index: 0,
///     longitude_deg: 100.0,
///     latitude_deg: 30.0,
///     filename: "X100Y30.csv".into(),
/// };
/// let sample = adapter.resolve_sample(&station, 180.0).unwrap();
/// println!("{:.2} C", sample.temp_c);
/// ```
#[derive(Debug, Clone)]
pub enum ProductAdapter {
    Cmfd2(Cmfd2Adapter),
    Era5(Era5Adapter),
    Gldas(GldasAdapter),
}

impl ProductAdapter {
    pub fn new(source: ForcingSourceConfig, clock: ForcingClock, options: QueryOptions) -> Self {
        match source.product() {
            Product::Cmfd2 => Self::Cmfd2(Cmfd2Adapter::new(source, clock, options)),
            Product::Era5 => Self::Era5(Era5Adapter::new(source, clock, options)),
            Product::Gldas => Self::Gldas(GldasAdapter::new(source, clock)),
        }
    }

    pub fn product(&self) -> Product {
        self.source().product()
    }

    pub fn source(&self) -> &ForcingSourceConfig {
        match self {
            Self::Cmfd2(a) => a.source(),
            Self::Era5(a) => a.source(),
            Self::Gldas(a) => a.source(),
        }
    }

    /// Canonical sample for `station` at `t_min` minutes after the forcing start.
    pub fn resolve_sample(&self, station: &Station, t_min: f64) -> Result<CanonicalSample, ProductError> {
        match self {
            Self::Cmfd2(a) => a.resolve_sample(station, t_min),
            Self::Era5(a) => a.resolve_sample(station, t_min),
            Self::Gldas(a) => a.resolve_sample(station, t_min),
        }
    }
}
