//! # forcmatch-product
//!
//! Point queries against gridded forcing products. Each adapter takes a
//! station and a time in minutes after the forcing start and returns the
//! same canonical, quantized sample the legacy station CSV would hold.
//!
//! | Product | Files | Notes |
//! |---------|-------|-------|
//! | CMFD2 | one file per variable and month, found by glob | instantaneous fields, precipitation units detected or overridden |
//! | ERA5 | one file per day, hourly steps | accumulated `tp`/`ssr` differenced against the next hour |
//! | GLDAS | one file per 3-hour step | masked cells remapped to the nearest valid cell |
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Product enum, source configuration, query options |
//! | `layout` | File naming per product |
//! | `units` | Precipitation unit detection |
//! | `physics` | Unit conversions and accumulated-field increments |
//! | `cmfd2`, `era5`, `gldas` | Per-product point adapters |
//! | `adapter` | Dispatch over the configured product |
//! | `error` | Error types |

mod adapter;
mod cmfd2;
mod config;
mod era5;
mod error;
mod gldas;
mod layout;
mod physics;
mod units;

pub use adapter::ProductAdapter;
pub use cmfd2::Cmfd2Adapter;
pub use config::{ForcingSourceConfig, Product, QueryOptions};
pub use era5::{ERA5_STEP_MIN, Era5Adapter, Era5Hour};
pub use error::ProductError;
pub use gldas::{
    GLDAS_STEP_MIN, GldasAdapter, GldasStep, StationCell, gldas_precip_unit, locate_valid_cell,
};
pub use layout::{cmfd2_file, era5_day_file, gldas_step_file, resolve_single_glob};
pub use physics::{
    Accumulation, KELVIN_OFFSET, energy_to_flux, kelvin_to_celsius, precip_m_to_mm_day,
    rh_from_dewpoint, rh_from_specific_humidity, saturation_vapour_pressure, wind_speed,
};
pub use units::PrecipUnit;
