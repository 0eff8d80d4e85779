//! # forcmatch-batch
//!
//! Whole-interval station forcing from ERA5 or GLDAS, written in the legacy
//! per-station CSV format.
//!
//! Station cells are resolved once. Each source file is opened once, the
//! bounding box covering every station is sliced out of it, and all
//! stations read their values from that slab before it is evicted.
//!
//! ## Quick Start
//!
//! ```ignore
//! use forcmatch_batch::{BatchForcingGenerator, SimInterval, write_station_series};
//!
//! let mut generator = BatchForcingGenerator::from_roster(source, &roster)?;
//! let series = generator.generate(&SimInterval::from_para(&para_path)?)?;
//! write_station_series(&roster.output_dir(&run_dir), generator.clock(), &series)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `plan` | Simulation interval and output steps |
//! | `stations` | Station cells and bounding-box offsets |
//! | `cache` | Per-file slab cache |
//! | `generator` | ERA5 and GLDAS drivers |
//! | `error` | Error types |

mod cache;
mod error;
mod generator;
mod plan;
mod stations;

pub use cache::{FileSlabs, SlabCache, TimeSelection};
pub use error::BatchError;
pub use generator::{BatchForcingGenerator, StationSeries, write_station_series};
pub use plan::{OutputSteps, SimInterval};
pub use stations::StationCells;
