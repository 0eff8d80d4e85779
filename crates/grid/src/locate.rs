//! Grid axes and nearest-index lookup.

use crate::convention::LonConvention;
use crate::error::GridError;

/// A `(lat, lon)` index pair into a grid variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCellIndex {
    pub lat_index: usize,
    pub lon_index: usize,
}

impl GridCellIndex {
    pub fn new(lat_index: usize, lon_index: usize) -> Self {
        Self {
            lat_index,
            lon_index,
        }
    }
}

/// Index of the entry in `values` closest to `target`.
///
/// Ties resolve to the lowest index and NaN entries are skipped. Returns
/// `None` when no entry has a comparable distance.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let d = (v - target).abs();
        if d.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// One-dimensional latitude and longitude coordinates of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    lats: Vec<f64>,
    lons: Vec<f64>,
    convention: LonConvention,
}

impl GridAxes {
    /// Build grid axes, detecting the longitude convention.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyCoordinate`] if either array is empty.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, GridError> {
        if lats.is_empty() {
            return Err(GridError::EmptyCoordinate { name: "lat" });
        }
        if lons.is_empty() {
            return Err(GridError::EmptyCoordinate { name: "lon" });
        }
        let convention = LonConvention::detect(&lons);
        Ok(Self {
            lats,
            lons,
            convention,
        })
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn convention(&self) -> LonConvention {
        self.convention
    }

    /// Nearest cell to a station coordinate.
    pub fn locate(&self, lon: f64, lat: f64) -> GridCellIndex {
        let slon = self.convention.normalize(lon);
        // Only an all-NaN coordinate falls back to index 0.
        let lat_index = nearest_index(&self.lats, lat).unwrap_or(0);
        let lon_index = nearest_index(&self.lons, slon).unwrap_or(0);
        GridCellIndex::new(lat_index, lon_index)
    }

    /// Squared degree-space distance from a station to a cell, with
    /// date-line wrap on `0..360` grids.
    pub fn distance2(&self, lon: f64, lat: f64, cell: GridCellIndex) -> f64 {
        let slon = self.convention.normalize(lon);
        let dlon = self
            .convention
            .lon_distance(self.lons[cell.lon_index], slon);
        let dlat = (self.lats[cell.lat_index] - lat).abs();
        dlon * dlon + dlat * dlat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_prefers_first_on_tie() {
        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], 0.5), Some(0));
        assert_eq!(nearest_index(&[0.0, 1.0, 2.0], 1.6), Some(2));
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn nearest_skips_nan() {
        assert_eq!(nearest_index(&[f64::NAN, 5.0, 9.0], 8.0), Some(2));
    }

    #[test]
    fn locate_on_signed_grid() {
        let axes = GridAxes::new(vec![30.0, 30.5, 31.0], vec![100.0, 100.5, 101.0]).unwrap();
        assert_eq!(axes.locate(100.6, 30.9), GridCellIndex::new(2, 1));
    }

    #[test]
    fn empty_axes_rejected() {
        assert_eq!(
            GridAxes::new(vec![], vec![1.0]),
            Err(GridError::EmptyCoordinate { name: "lat" })
        );
        assert_eq!(
            GridAxes::new(vec![1.0], vec![]),
            Err(GridError::EmptyCoordinate { name: "lon" })
        );
    }
}
