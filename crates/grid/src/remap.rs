//! Expanding-ring search for the nearest valid cell.

use crate::error::GridError;
use crate::locate::{GridAxes, GridCellIndex};

/// Largest ring radius, in cells, searched by [`remap_search`].
pub const DEFAULT_MAX_REMAP_RADIUS: usize = 10;

/// Find a valid cell near `start` when `start` itself holds no data.
///
/// Rings of radius `1..=max_radius` around `start` are scanned as full
/// squares clamped to the grid, latitude-major. The first ring containing
/// any valid cell wins, and within it the cell with the smallest squared
/// degree distance to the station is returned (the earliest in scan order on
/// ties).
///
/// # Errors
///
/// Returns [`GridError::NoValidGridCellFound`] if every ring is exhausted.
pub fn remap_search<F>(
    axes: &GridAxes,
    lon: f64,
    lat: f64,
    start: GridCellIndex,
    max_radius: usize,
    mut is_valid: F,
) -> Result<GridCellIndex, GridError>
where
    F: FnMut(GridCellIndex) -> bool,
{
    let lat_max = axes.lats().len() - 1;
    let lon_max = axes.lons().len() - 1;

    for r in 1..=max_radius {
        let k_range = start.lat_index.saturating_sub(r)..=(start.lat_index + r).min(lat_max);
        let j_range = start.lon_index.saturating_sub(r)..=(start.lon_index + r).min(lon_max);

        let mut best: Option<(GridCellIndex, f64)> = None;
        for k in k_range {
            for j in j_range.clone() {
                let cell = GridCellIndex::new(k, j);
                if !is_valid(cell) {
                    continue;
                }
                let d2 = axes.distance2(lon, lat, cell);
                if best.is_none_or(|(_, bd)| d2 < bd) {
                    best = Some((cell, d2));
                }
            }
        }
        if let Some((cell, _)) = best {
            return Ok(cell);
        }
    }

    Err(GridError::NoValidGridCellFound {
        lon,
        lat,
        lat_index: start.lat_index,
        lon_index: start.lon_index,
        max_radius,
    })
}
