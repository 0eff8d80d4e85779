//! Bounding box over a set of grid cells.

use std::ops::Range;

use crate::locate::GridCellIndex;

/// The smallest index rectangle covering a set of cells.
///
/// Ranges are half-open, so a box around a single cell has length 1 in
/// both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub lat: Range<usize>,
    pub lon: Range<usize>,
}

impl BoundingBox {
    /// Box covering every cell, or `None` when there are none.
    pub fn covering<I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = GridCellIndex>,
    {
        let mut iter = cells.into_iter();
        let first = iter.next()?;
        let init = (
            first.lat_index,
            first.lat_index,
            first.lon_index,
            first.lon_index,
        );
        let (lat_lo, lat_hi, lon_lo, lon_hi) =
            iter.fold(init, |(a, b, c, d), cell| {
                (
                    a.min(cell.lat_index),
                    b.max(cell.lat_index),
                    c.min(cell.lon_index),
                    d.max(cell.lon_index),
                )
            });
        Some(Self {
            lat: lat_lo..lat_hi + 1,
            lon: lon_lo..lon_hi + 1,
        })
    }

    pub fn lat_len(&self) -> usize {
        self.lat.len()
    }

    pub fn lon_len(&self) -> usize {
        self.lon.len()
    }

    /// Row-major offset of `cell` inside a `[lat, lon]` slab of this box.
    pub fn offset_of(&self, cell: GridCellIndex) -> Option<usize> {
        if !self.lat.contains(&cell.lat_index) || !self.lon.contains(&cell.lon_index) {
            return None;
        }
        let k = cell.lat_index - self.lat.start;
        let j = cell.lon_index - self.lon.start;
        Some(k * self.lon_len() + j)
    }
}
