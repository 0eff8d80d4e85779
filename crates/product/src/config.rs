//! Forcing-source configuration and query options.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use forcmatch_io::{DimensionNames, KvConfig};
use forcmatch_time::DEFAULT_TIME_TOLERANCE_MIN;

use crate::error::ProductError;
use crate::units::PrecipUnit;

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// Supported gridded forcing product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// Monthly per-variable files, instantaneous fields.
    Cmfd2,
    /// Daily files with hourly steps, accumulated precipitation and radiation.
    Era5,
    /// One file per 3-hour step holding every variable.
    Gldas,
}

impl Product {
    /// `NC_VAR_<KEY>` keys the product reads.
    pub fn variable_keys(self) -> &'static [&'static str] {
        match self {
            Self::Cmfd2 => &["PREC", "TEMP", "SHUM", "SRAD", "WIND", "PRES"],
            Self::Era5 => &["TP", "T2M", "D2M", "U10", "V10", "SSR"],
            Self::Gldas => &["PREC", "TEMP", "SHUM", "PRES", "WIND", "SRAD"],
        }
    }

    /// Default `(time, lat, lon)` dimension names.
    pub fn default_dimensions(self) -> DimensionNames {
        match self {
            Self::Era5 => DimensionNames::new("time", "latitude", "longitude"),
            Self::Cmfd2 | Self::Gldas => DimensionNames::new("time", "lat", "lon"),
        }
    }

    /// Native output step in minutes for batch generation, where supported.
    pub fn native_step_min(self) -> Option<i64> {
        match self {
            Self::Era5 => Some(60),
            Self::Gldas => Some(180),
            Self::Cmfd2 => None,
        }
    }
}

impl FromStr for Product {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CMFD2" => Ok(Self::Cmfd2),
            "ERA5" => Ok(Self::Era5),
            "GLDAS" => Ok(Self::Gldas),
            _ => Err(ProductError::UnsupportedProduct {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cmfd2 => "CMFD2",
            Self::Era5 => "ERA5",
            Self::Gldas => "GLDAS",
        })
    }
}

// ---------------------------------------------------------------------------
// ForcingSourceConfig
// ---------------------------------------------------------------------------

/// Where and how a gridded forcing product is stored.
///
/// Read-only for the lifetime of a run. Build it from a `*.cfg.forcing`
/// file with [`ForcingSourceConfig::from_kv`], or with the builder methods.
///
/// # Example
///
/// ```
/// use forcmatch_product::{ForcingSourceConfig, Product};
///
/// let cfg = ForcingSourceConfig::new(Product::Gldas, "/data/gldas", "{year}/{doy}/G.A{yyyymmdd}.{hhmm}.nc4")
///     .with_variable("PREC", "Rainf_f_tavg")
///     .with_variable("TEMP", "Tair_f_inst")
///     .with_variable("SHUM", "Qair_f_inst")
///     .with_variable("PRES", "Psurf_f_inst")
///     .with_variable("WIND", "Wind_f_inst")
///     .with_variable("SRAD", "SWdown_f_tavg");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingSourceConfig {
    product: Product,
    data_root: PathBuf,
    file_pattern: String,
    dimensions: DimensionNames,
    variables: BTreeMap<String, String>,
    variable_dirs: BTreeMap<String, String>,
    precip_units: Option<PrecipUnit>,
    year_subdir: bool,
}

impl ForcingSourceConfig {
    /// A configuration with the product's default dimension names, no
    /// variables, automatic precipitation units and no per-year directories.
    pub fn new(product: Product, data_root: impl Into<PathBuf>, file_pattern: impl Into<String>) -> Self {
        Self {
            product,
            data_root: data_root.into(),
            file_pattern: file_pattern.into(),
            dimensions: product.default_dimensions(),
            variables: BTreeMap::new(),
            variable_dirs: BTreeMap::new(),
            precip_units: None,
            year_subdir: false,
        }
    }

    /// Validated configuration from a parsed `*.cfg.forcing` file.
    ///
    /// A relative `DATA_ROOT` is resolved against `nc_run`.
    ///
    /// # Errors
    ///
    /// [`ProductError::UnsupportedProduct`] for an unknown `PRODUCT`;
    /// [`ProductError::Io`] wrapping a `Config` error for a missing key;
    /// [`ProductError::InvalidConfig`] for a bad `CMFD_PRECIP_UNITS`.
    pub fn from_kv(kv: &KvConfig, nc_run: &Path) -> Result<Self, ProductError> {
        let product: Product = kv.require("PRODUCT")?.parse()?;

        let raw_root = Path::new(kv.require("DATA_ROOT")?);
        let data_root = if raw_root.is_absolute() {
            raw_root.to_path_buf()
        } else {
            nc_run.join(raw_root)
        };

        let defaults = product.default_dimensions();
        let time_dim = kv.get_or("NC_DIM_TIME", &defaults.time_dim);
        let lat_dim = kv.get_or("NC_DIM_LAT", &defaults.lat_dim);
        let lon_dim = kv.get_or("NC_DIM_LON", &defaults.lon_dim);
        let dimensions = DimensionNames::new(time_dim, lat_dim, lon_dim)
            .with_time_var(kv.get_or("TIME_VAR", time_dim))
            .with_lat_var(kv.get_or("LAT_VAR", lat_dim))
            .with_lon_var(kv.get_or("LON_VAR", lon_dim));

        let mut cfg = Self::new(product, data_root, kv.require("LAYOUT_FILE_PATTERN")?)
            .with_dimension_names(dimensions)
            .with_year_subdir(kv.flag("LAYOUT_YEAR_SUBDIR"));

        for key in product.variable_keys() {
            cfg = cfg.with_variable(key, kv.require(&format!("NC_VAR_{key}"))?);
            if product == Product::Cmfd2 {
                cfg = cfg.with_variable_dir(key, kv.require(&format!("LAYOUT_VAR_DIR_{key}"))?);
            }
        }
        if product == Product::Cmfd2 {
            let units = PrecipUnit::parse_override(kv.get_or("CMFD_PRECIP_UNITS", ""))?;
            cfg = cfg.with_precip_units(units);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the dimension and coordinate variable names.
    pub fn with_dimension_names(mut self, dims: DimensionNames) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set the NetCDF variable name for an `NC_VAR_<KEY>` key.
    pub fn with_variable(mut self, key: &str, name: impl Into<String>) -> Self {
        self.variables.insert(key.to_uppercase(), name.into());
        self
    }

    /// Set the per-variable directory (CMFD2 `LAYOUT_VAR_DIR_<KEY>`).
    pub fn with_variable_dir(mut self, key: &str, dir: impl Into<String>) -> Self {
        self.variable_dirs.insert(key.to_uppercase(), dir.into());
        self
    }

    /// Force the precipitation unit instead of detecting it (CMFD2 only).
    pub fn with_precip_units(mut self, unit: Option<PrecipUnit>) -> Self {
        self.precip_units = unit;
        self
    }

    /// Look for ERA5 day files under a `<yyyy>/` subdirectory.
    pub fn with_year_subdir(mut self, enabled: bool) -> Self {
        self.year_subdir = enabled;
        self
    }

    // --- Accessors ---

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn file_pattern(&self) -> &str {
        &self.file_pattern
    }

    pub fn dimensions(&self) -> &DimensionNames {
        &self.dimensions
    }

    pub fn precip_units(&self) -> Option<PrecipUnit> {
        self.precip_units
    }

    pub fn year_subdir(&self) -> bool {
        self.year_subdir
    }

    /// NetCDF variable name configured for `key`.
    ///
    /// # Errors
    ///
    /// [`ProductError::InvalidConfig`] if the key was never set.
    pub fn variable(&self, key: &str) -> Result<&str, ProductError> {
        self.variables
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ProductError::InvalidConfig {
                reason: format!("missing NC_VAR_{key}"),
            })
    }

    /// Per-variable directory configured for `key`.
    ///
    /// # Errors
    ///
    /// [`ProductError::InvalidConfig`] if the key was never set.
    pub fn variable_dir(&self, key: &str) -> Result<&str, ProductError> {
        self.variable_dirs
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ProductError::InvalidConfig {
                reason: format!("missing LAYOUT_VAR_DIR_{key}"),
            })
    }

    /// Check that the pattern is set and every variable the product reads
    /// (and, for CMFD2, its directory) is configured.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.file_pattern.trim().is_empty() {
            return Err(ProductError::InvalidConfig {
                reason: "LAYOUT_FILE_PATTERN must not be empty".to_string(),
            });
        }
        for key in self.product.variable_keys() {
            self.variable(key)?;
            if self.product == Product::Cmfd2 {
                self.variable_dir(key)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// QueryOptions
// ---------------------------------------------------------------------------

/// Time lookup options for point queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    clamp: bool,
    time_tolerance_min: f64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            clamp: false,
            time_tolerance_min: DEFAULT_TIME_TOLERANCE_MIN,
        }
    }
}

impl QueryOptions {
    /// Clamp out-of-range times to the first/last record instead of failing.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Tolerance, in minutes, for range checks and record selection.
    pub fn with_time_tolerance(mut self, minutes: f64) -> Self {
        self.time_tolerance_min = minutes;
        self
    }

    pub fn clamp(&self) -> bool {
        self.clamp
    }

    pub fn time_tolerance_min(&self) -> f64 {
        self.time_tolerance_min
    }
}
