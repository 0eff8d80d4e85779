//! # forcmatch-quantize
//!
//! Final-stage quantisation of forcing values.
//!
//! Every product adapter ends with the same per-variable rules so that the
//! gridded path and the legacy CSV path agree to the last printed digit.
//! Rounding is half-to-even on `x * 10^d`, the same as C `nearbyint`.
//!
//! | Variable | Sanitise | Round | After rounding |
//! |----------|----------|-------|----------------|
//! | precipitation (mm/day) | non-finite or negative → 0 | 4 dp | `< 0.0001` → 0 |
//! | temperature (°C) | non-finite → 0 | 2 dp | |
//! | relative humidity (0–1) | non-finite → 0, clamp to [0, 1] | 4 dp | re-clamp |
//! | wind speed (m/s) | `abs`, non-finite → 0 | 2 dp | floor at 0.05 |
//! | net radiation (W/m²) | non-finite or negative → 0 | 0 dp | |
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `rules` | Per-variable quantisation functions |
//! | `sample` | `RawSample`, `CanonicalSample` and `ForcingVariable` |

mod rules;
mod sample;

pub use rules::{
    MIN_PRECIP_MM_DAY, MIN_WIND_M_S, quantize_precip, quantize_radiation, quantize_rh,
    quantize_temp, quantize_wind, round_half_even,
};
pub use sample::{CanonicalSample, ForcingVariable, RawSample};
