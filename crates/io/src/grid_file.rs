//! Scoped NetCDF grid handle with decoded point and slab reads.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use forcmatch_grid::{BoundingBox, GridAxes, GridCellIndex};
use forcmatch_time::{TimeAxis, TimeError, parse_time_units};
use netcdf::AttributeValue;
use tracing::debug;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// DimensionNames
// ---------------------------------------------------------------------------

/// Names of the time/lat/lon dimensions and of their coordinate variables.
///
/// Coordinate variable names default to the dimension names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionNames {
    pub time_dim: String,
    pub lat_dim: String,
    pub lon_dim: String,
    pub time_var: String,
    pub lat_var: String,
    pub lon_var: String,
}

impl Default for DimensionNames {
    fn default() -> Self {
        Self::new("time", "lat", "lon")
    }
}

impl DimensionNames {
    /// Dimension names whose coordinate variables share the same names.
    pub fn new(time: impl Into<String>, lat: impl Into<String>, lon: impl Into<String>) -> Self {
        let (time, lat, lon) = (time.into(), lat.into(), lon.into());
        Self {
            time_var: time.clone(),
            lat_var: lat.clone(),
            lon_var: lon.clone(),
            time_dim: time,
            lat_dim: lat,
            lon_dim: lon,
        }
    }

    /// Set the time coordinate variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Set the latitude coordinate variable name.
    pub fn with_lat_var(mut self, name: impl Into<String>) -> Self {
        self.lat_var = name.into();
        self
    }

    /// Set the longitude coordinate variable name.
    pub fn with_lon_var(mut self, name: impl Into<String>) -> Self {
        self.lon_var = name.into();
        self
    }
}

// ---------------------------------------------------------------------------
// CellValue / VarDecoding
// ---------------------------------------------------------------------------

/// A single decoded grid value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    /// A usable value, already unpacked with `scale_factor`/`add_offset`.
    Value(f64),
    /// The raw value equals `_FillValue` or `missing_value`.
    Masked,
    /// The raw or unpacked value is NaN or infinite.
    NonFinite,
}

impl CellValue {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Masked | Self::NonFinite => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Per-variable packing and masking attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecoding {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: f64,
    pub add_offset: f64,
}

impl Default for VarDecoding {
    fn default() -> Self {
        Self {
            fill_value: None,
            missing_value: None,
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl VarDecoding {
    fn of(var: &netcdf::Variable<'_>) -> Self {
        Self {
            fill_value: attr_f64(var, "_FillValue"),
            missing_value: attr_f64(var, "missing_value"),
            scale_factor: attr_f64(var, "scale_factor").unwrap_or(1.0),
            add_offset: attr_f64(var, "add_offset").unwrap_or(0.0),
        }
    }

    /// Classify and unpack one raw (packed) value.
    pub fn decode(&self, raw: f64) -> CellValue {
        if !raw.is_finite() {
            return CellValue::NonFinite;
        }
        if self.fill_value == Some(raw) || self.missing_value == Some(raw) {
            return CellValue::Masked;
        }
        let v = raw * self.scale_factor + self.add_offset;
        if v.is_finite() {
            CellValue::Value(v)
        } else {
            CellValue::NonFinite
        }
    }
}

fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Slab
// ---------------------------------------------------------------------------

/// A decoded `[time, lat, lon]` hyperslab covering a bounding box.
#[derive(Debug, Clone)]
pub struct Slab {
    var: String,
    path: PathBuf,
    origin: [usize; 3],
    shape: [usize; 3],
    strides: [usize; 3],
    raw: Vec<f64>,
    decoding: VarDecoding,
}

impl Slab {
    /// Number of time steps held.
    pub fn time_len(&self) -> usize {
        self.shape[0]
    }

    /// Decoded value at a time offset and a cell offset into the box.
    ///
    /// Offsets outside the slab are reported as `NonFinite`.
    pub fn cell(&self, t: usize, lat_off: usize, lon_off: usize) -> CellValue {
        if t >= self.shape[0] || lat_off >= self.shape[1] || lon_off >= self.shape[2] {
            return CellValue::NonFinite;
        }
        let i = t * self.strides[0] + lat_off * self.strides[1] + lon_off * self.strides[2];
        self.raw
            .get(i)
            .map_or(CellValue::NonFinite, |&raw| self.decoding.decode(raw))
    }

    /// Like [`Slab::cell`] but masked or non-finite values are an error.
    ///
    /// # Errors
    ///
    /// [`IoError::MaskedValue`] or [`IoError::NonFiniteValue`] naming the
    /// absolute `[time, lat, lon]` index.
    pub fn require(&self, t: usize, lat_off: usize, lon_off: usize) -> Result<f64, IoError> {
        let index = vec![
            self.origin[0] + t,
            self.origin[1] + lat_off,
            self.origin[2] + lon_off,
        ];
        match self.cell(t, lat_off, lon_off) {
            CellValue::Value(v) => Ok(v),
            CellValue::Masked => Err(IoError::MaskedValue {
                var: self.var.clone(),
                index,
                path: self.path.clone(),
            }),
            CellValue::NonFinite => Err(IoError::NonFiniteValue {
                var: self.var.clone(),
                index,
                path: self.path.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// GridFile
// ---------------------------------------------------------------------------

/// An open, read-only NetCDF file. The handle is released on drop.
pub struct GridFile {
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for GridFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFile").field("path", &self.path).finish()
    }
}

impl GridFile {
    /// Open `path` read-only.
    ///
    /// # Errors
    ///
    /// [`IoError::FileNotFound`] if the path does not exist, or
    /// [`IoError::Netcdf`] if the library cannot open it.
    pub fn open(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = netcdf::open(path)?;
        debug!(path = %path.display(), "opened grid file");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>, IoError> {
        self.file
            .variable(name)
            .ok_or_else(|| IoError::MissingVariable {
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    fn read_failed(&self, var: &str, e: netcdf::Error) -> IoError {
        IoError::ReadFailed {
            var: var.to_string(),
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    /// Whether the file contains a variable called `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Dimension names of a variable, in storage order.
    pub fn dimension_names(&self, var: &str) -> Result<Vec<String>, IoError> {
        let v = self.variable(var)?;
        Ok(v.dimensions().iter().map(|d| d.name()).collect())
    }

    /// Read a whole 1-D variable, trying each alias in order.
    ///
    /// # Errors
    ///
    /// [`IoError::MissingVariable`] naming the first alias if none exist.
    pub fn read_1d(&self, aliases: &[&str]) -> Result<Vec<f64>, IoError> {
        for &alias in aliases {
            if let Some(var) = self.file.variable(alias) {
                return var
                    .get_values::<f64, _>(..)
                    .map_err(|e| self.read_failed(alias, e));
            }
        }
        let name = aliases.first().copied().unwrap_or("unknown");
        Err(IoError::MissingVariable {
            name: name.to_string(),
            path: self.path.clone(),
        })
    }

    /// Latitude/longitude coordinate arrays as [`GridAxes`].
    pub fn grid_axes(&self, dims: &DimensionNames) -> Result<GridAxes, IoError> {
        let lats = self.read_1d(&[dims.lat_var.as_str(), dims.lat_dim.as_str()])?;
        let lons = self.read_1d(&[dims.lon_var.as_str(), dims.lon_dim.as_str()])?;
        Ok(GridAxes::new(lats, lons)?)
    }

    /// The `units` attribute of a variable, if it is a string.
    pub fn units(&self, var: &str) -> Result<Option<String>, IoError> {
        let v = self.variable(var)?;
        Ok(match v.attribute_value("units") {
            Some(Ok(AttributeValue::Str(s))) => Some(s),
            _ => None,
        })
    }

    /// Resolve the time coordinate into minutes since `epoch`.
    ///
    /// # Errors
    ///
    /// [`TimeError::UnsupportedTimeEncoding`] (wrapped) when `units` is
    /// missing, blank or unparseable; [`TimeError::NonMonotonicTimeAxis`]
    /// when the axis runs backwards.
    pub fn time_axis(&self, time_var: &str, epoch: NaiveDateTime) -> Result<TimeAxis, IoError> {
        let offsets = self.read_1d(&[time_var])?;
        let units = self
            .units(time_var)?
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| TimeError::UnsupportedTimeEncoding {
                units: String::new(),
                reason: format!(
                    "time variable '{time_var}' in {} has no units",
                    self.path.display()
                ),
            })?;
        let encoding = parse_time_units(&units)?;
        Ok(TimeAxis::resolve(encoding, &offsets, epoch)?)
    }

    /// Index per variable dimension: named dimensions take the given
    /// index, every other dimension index 0.
    fn index_for(
        &self,
        var_name: &str,
        var: &netcdf::Variable<'_>,
        named: &[(&str, usize)],
    ) -> Result<Vec<usize>, IoError> {
        let dims = var.dimensions();
        for (name, _) in named {
            if !dims.iter().any(|d| d.name() == *name) {
                return Err(IoError::MissingDimension {
                    var: var_name.to_string(),
                    dim: (*name).to_string(),
                    path: self.path.clone(),
                });
            }
        }
        dims.iter()
            .map(|d| {
                let dim_name = d.name();
                let index = named
                    .iter()
                    .find(|(n, _)| *n == dim_name)
                    .map_or(0, |&(_, i)| i);
                if index >= d.len() {
                    return Err(IoError::IndexOutOfBounds {
                        var: var_name.to_string(),
                        dim: dim_name,
                        index,
                        len: d.len(),
                        path: self.path.clone(),
                    });
                }
                Ok(index)
            })
            .collect()
    }

    fn read_named(
        &self,
        var_name: &str,
        named: &[(&str, usize)],
    ) -> Result<(CellValue, Vec<usize>), IoError> {
        let var = self.variable(var_name)?;
        let index = self.index_for(var_name, &var, named)?;
        let ranges: Vec<Range<usize>> = index.iter().map(|&i| i..i + 1).collect();
        let values = get_ranges(&var, &ranges).map_err(|e| self.read_failed(var_name, e))?;
        let raw = values.first().copied().unwrap_or(f64::NAN);
        Ok((VarDecoding::of(&var).decode(raw), index))
    }

    fn require_named(&self, var_name: &str, named: &[(&str, usize)]) -> Result<f64, IoError> {
        let (value, index) = self.read_named(var_name, named)?;
        match value {
            CellValue::Value(v) => Ok(v),
            CellValue::Masked => Err(IoError::MaskedValue {
                var: var_name.to_string(),
                index,
                path: self.path.clone(),
            }),
            CellValue::NonFinite => Err(IoError::NonFiniteValue {
                var: var_name.to_string(),
                index,
                path: self.path.clone(),
            }),
        }
    }

    /// Decoded value of `var` at a time index and grid cell.
    ///
    /// Dimensions of `var` other than the configured time/lat/lon take
    /// index 0. A variable without one of those dimensions simply ignores
    /// that index.
    pub fn read_point(
        &self,
        var: &str,
        dims: &DimensionNames,
        time_index: usize,
        cell: GridCellIndex,
    ) -> Result<CellValue, IoError> {
        let names = self.dimension_names(var)?;
        let named = point_dims(&names, dims, time_index, cell);
        Ok(self.read_named(var, &named)?.0)
    }

    /// Like [`GridFile::read_point`] but masked or non-finite values are
    /// an error naming the file, variable and index.
    pub fn require_point(
        &self,
        var: &str,
        dims: &DimensionNames,
        time_index: usize,
        cell: GridCellIndex,
    ) -> Result<f64, IoError> {
        let names = self.dimension_names(var)?;
        let named = point_dims(&names, dims, time_index, cell);
        self.require_named(var, &named)
    }

    /// Value of `var` at explicitly named dimension indices. Every named
    /// dimension must exist on the variable.
    pub fn require_at(&self, var: &str, named: &[(&str, usize)]) -> Result<f64, IoError> {
        self.require_named(var, named)
    }

    /// Read the `[time, lat, lon]` hyperslab of `var` covering `bbox`.
    ///
    /// # Errors
    ///
    /// [`IoError::MissingDimension`] if `var` lacks one of the three
    /// dimensions; [`IoError::IndexOutOfBounds`] if the request exceeds them.
    pub fn read_slab(
        &self,
        var_name: &str,
        dims: &DimensionNames,
        time: Range<usize>,
        bbox: &BoundingBox,
    ) -> Result<Slab, IoError> {
        let var = self.variable(var_name)?;
        let wanted = [
            (dims.time_dim.as_str(), time.clone()),
            (dims.lat_dim.as_str(), bbox.lat.clone()),
            (dims.lon_dim.as_str(), bbox.lon.clone()),
        ];

        let var_dims = var.dimensions();
        let mut ranges = Vec::with_capacity(var_dims.len());
        let mut position = [usize::MAX; 3];
        for (axis, d) in var_dims.iter().enumerate() {
            let dim_name = d.name();
            let range = match wanted.iter().position(|(n, _)| *n == dim_name) {
                Some(slot) => {
                    position[slot] = axis;
                    wanted[slot].1.clone()
                }
                None => 0..1,
            };
            if range.end > d.len() || range.is_empty() {
                return Err(IoError::IndexOutOfBounds {
                    var: var_name.to_string(),
                    dim: dim_name,
                    index: range.end.saturating_sub(1),
                    len: d.len(),
                    path: self.path.clone(),
                });
            }
            ranges.push(range);
        }
        for (slot, (name, _)) in wanted.iter().enumerate() {
            if position[slot] == usize::MAX {
                return Err(IoError::MissingDimension {
                    var: var_name.to_string(),
                    dim: (*name).to_string(),
                    path: self.path.clone(),
                });
            }
        }

        // Row-major strides of the read block in storage order.
        let lens: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        let mut storage_strides = vec![1usize; lens.len()];
        for i in (0..lens.len().saturating_sub(1)).rev() {
            storage_strides[i] = storage_strides[i + 1] * lens[i + 1];
        }

        let raw = get_ranges(&var, &ranges).map_err(|e| self.read_failed(var_name, e))?;
        debug!(
            path = %self.path.display(),
            var = var_name,
            values = raw.len(),
            "read slab"
        );

        Ok(Slab {
            var: var_name.to_string(),
            path: self.path.clone(),
            origin: [time.start, bbox.lat.start, bbox.lon.start],
            shape: [time.len(), bbox.lat_len(), bbox.lon_len()],
            strides: position.map(|p| storage_strides[p]),
            raw,
            decoding: VarDecoding::of(&var),
        })
    }
}

fn point_dims<'a>(
    var_dims: &[String],
    dims: &'a DimensionNames,
    time_index: usize,
    cell: GridCellIndex,
) -> Vec<(&'a str, usize)> {
    [
        (dims.time_dim.as_str(), time_index),
        (dims.lat_dim.as_str(), cell.lat_index),
        (dims.lon_dim.as_str(), cell.lon_index),
    ]
    .into_iter()
    .filter(|(name, _)| var_dims.iter().any(|d| d.as_str() == *name))
    .collect()
}

/// Read a block given one range per variable dimension.
fn get_ranges(var: &netcdf::Variable<'_>, r: &[Range<usize>]) -> Result<Vec<f64>, netcdf::Error> {
    match r {
        [] => var.get_values::<f64, _>(..),
        [a] => {
            let all = var.get_values::<f64, _>(..)?;
            all.get(a.clone())
                .map(<[f64]>::to_vec)
                .ok_or_else(|| netcdf::Error::Str(format!("range {a:?} out of bounds")))
        }
        [a, b] => var.get_values::<f64, _>((a.clone(), b.clone())),
        [a, b, c] => var.get_values::<f64, _>((a.clone(), b.clone(), c.clone())),
        [a, b, c, d] => var.get_values::<f64, _>((a.clone(), b.clone(), c.clone(), d.clone())),
        [a, b, c, d, e] => {
            var.get_values::<f64, _>((a.clone(), b.clone(), c.clone(), d.clone(), e.clone()))
        }
        _ => Err(netcdf::Error::Str(format!(
            "variables with {} dimensions are not supported",
            r.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_unpacks_and_masks() {
        let d = VarDecoding {
            fill_value: Some(-32767.0),
            missing_value: Some(-9999.0),
            scale_factor: 0.5,
            add_offset: 100.0,
        };
        assert_eq!(d.decode(10.0), CellValue::Value(105.0));
        assert_eq!(d.decode(-32767.0), CellValue::Masked);
        assert_eq!(d.decode(-9999.0), CellValue::Masked);
        assert_eq!(d.decode(f64::NAN), CellValue::NonFinite);
    }

    #[test]
    fn default_decoding_is_identity() {
        let d = VarDecoding::default();
        assert_eq!(d.decode(1.25), CellValue::Value(1.25));
    }

    #[test]
    fn cell_value_accessors() {
        assert_eq!(CellValue::Value(2.0).value(), Some(2.0));
        assert!(CellValue::Value(2.0).is_valid());
        assert!(!CellValue::Masked.is_valid());
        assert_eq!(CellValue::NonFinite.value(), None);
    }

    #[test]
    fn dimension_names_default_coordinates() {
        let d = DimensionNames::new("time", "latitude", "longitude").with_lat_var("lat2d");
        assert_eq!(d.lat_var, "lat2d");
        assert_eq!(d.lon_var, "longitude");
        assert_eq!(DimensionNames::default().time_var, "time");
    }
}
