//! # forcmatch-io
//!
//! File formats around the forcing comparison: raw NetCDF grid reads, the
//! `KEY VALUE` configuration files, the station roster (`*.tsd.forc`), the
//! legacy per-station forcing CSV and the legacy binary model output.
//!
//! Every grid read is decoded into a [`CellValue`] so that fill-value and
//! non-finite cells are explicit. Callers either feed that into a validity
//! predicate (remap search) or turn it into a hard error with
//! [`GridFile::require_point`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use forcmatch_io::{DimensionNames, GridFile, StationRoster};
//!
//! let roster = StationRoster::read(&run_dir.join("input/prj/prj.tsd.forc"))?;
//! let grid = GridFile::open(&path)?;
//! let axes = grid.grid_axes(&DimensionNames::default())?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid_file` | Scoped NetCDF handle, decoded point and slab reads |
//! | `kv` | `KEY VALUE` configuration files |
//! | `roster` | Station roster and station CSV paths |
//! | `run_dir` | `<run>/input/<prj>/` file layout |
//! | `legacy_csv` | Legacy per-station forcing CSV reader and writer |
//! | `legacy_bin` | Legacy binary model output reader |
//! | `error` | Error types |

mod error;
mod grid_file;
mod kv;
mod legacy_bin;
mod legacy_csv;
mod roster;
mod run_dir;

pub use error::IoError;
pub use grid_file::{CellValue, DimensionNames, GridFile, Slab, VarDecoding};
pub use kv::{KvConfig, read_para_interval};
pub use legacy_bin::{LegacyBinary, find_time_index};
pub use legacy_csv::{StationCsv, write_station_csv};
pub use roster::{Station, StationRoster};
pub use run_dir::RunDir;
