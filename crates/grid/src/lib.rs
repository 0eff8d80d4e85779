//! # forcmatch-grid
//!
//! Spatial lookup on regular latitude/longitude grids.
//!
//! Maps a station coordinate to the nearest `(lat, lon)` index pair,
//! normalising the station longitude to the grid's own convention, and
//! provides the expanding-ring search used when that nearest cell holds no
//! data.
//!
//! ## Quick Start
//!
//! ```ignore
//! use forcmatch_grid::{GridAxes, remap_search, DEFAULT_MAX_REMAP_RADIUS};
//!
//! let axes = GridAxes::new(lats, lons)?;
//! let nearest = axes.locate(station_lon, station_lat);
//! let cell = if is_valid(nearest) {
//!     nearest
//! } else {
//!     remap_search(&axes, station_lon, station_lat, nearest, DEFAULT_MAX_REMAP_RADIUS, is_valid)?
//! };
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `convention` | `-180..180` vs `0..360` longitude handling |
//! | `locate` | Grid axes and nearest-index lookup |
//! | `remap` | Expanding-ring search for a valid cell |
//! | `bbox` | Bounding box covering a set of cells |
//! | `error` | Error types |

mod bbox;
mod convention;
mod error;
mod locate;
mod remap;

pub use bbox::BoundingBox;
pub use convention::LonConvention;
pub use error::GridError;
pub use locate::{GridAxes, GridCellIndex, nearest_index};
pub use remap::{DEFAULT_MAX_REMAP_RADIUS, remap_search};
