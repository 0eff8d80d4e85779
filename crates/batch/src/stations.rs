//! Station cells and their offsets into a shared bounding box.

use forcmatch_grid::{BoundingBox, GridCellIndex};

use crate::error::BatchError;

/// Grid cell of every station plus the box covering them all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCells {
    cells: Vec<GridCellIndex>,
    bbox: BoundingBox,
}

impl StationCells {
    /// # Errors
    ///
    /// [`BatchError::EmptyRoster`] when `cells` is empty.
    pub fn new(cells: Vec<GridCellIndex>) -> Result<Self, BatchError> {
        let bbox = BoundingBox::covering(cells.iter().copied()).ok_or(BatchError::EmptyRoster)?;
        Ok(Self { cells, bbox })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(lat, lon)` offset of station `i` inside the box.
    pub fn offset(&self, i: usize) -> (usize, usize) {
        let cell = self.cells[i];
        (
            cell.lat_index - self.bbox.lat.start,
            cell.lon_index - self.bbox.lon.start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_relative_to_the_box() {
        let cells = StationCells::new(vec![
            GridCellIndex::new(5, 9),
            GridCellIndex::new(3, 12),
            GridCellIndex::new(5, 9),
        ])
        .unwrap();
        assert_eq!(cells.bbox().lat, 3..6);
        assert_eq!(cells.bbox().lon, 9..13);
        assert_eq!(cells.offset(0), (2, 0));
        assert_eq!(cells.offset(1), (0, 3));
        assert_eq!(cells.offset(2), cells.offset(0));
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert!(matches!(StationCells::new(vec![]), Err(BatchError::EmptyRoster)));
    }
}
