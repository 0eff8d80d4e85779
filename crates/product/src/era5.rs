//! ERA5: daily files of hourly steps with accumulated precipitation and
//! radiation.

use chrono::Duration;
use forcmatch_io::{GridFile, Station};
use forcmatch_quantize::{CanonicalSample, RawSample};
use forcmatch_time::{ForcingClock, TimeError};
use tracing::debug;

use crate::adapter::require_value;
use crate::config::{ForcingSourceConfig, QueryOptions};
use crate::error::ProductError;
use crate::layout::era5_day_file;
use crate::physics::{
    Accumulation, energy_to_flux, kelvin_to_celsius, precip_m_to_mm_day, rh_from_dewpoint,
    wind_speed,
};

/// Minutes between ERA5 steps.
pub const ERA5_STEP_MIN: i64 = 60;

/// Raw ERA5 values of one station at one hour, plus the accumulators of
/// the following hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Era5Hour {
    pub tp0_m: f64,
    pub tp1_m: f64,
    pub ssr0_j_m2: f64,
    pub ssr1_j_m2: f64,
    pub t2m_k: f64,
    pub d2m_k: f64,
    pub u10: f64,
    pub v10: f64,
}

impl Era5Hour {
    /// Convert to physical values over an interval of `dt_seconds`.
    ///
    /// Relative humidity uses the unrounded air temperature.
    pub fn to_raw_sample(&self, dt_seconds: f64) -> RawSample {
        let tp_m = Accumulation::PRECIP_M.increment(self.tp0_m, self.tp1_m);
        let ssr = Accumulation::RADIATION_J_M2.increment(self.ssr0_j_m2, self.ssr1_j_m2);
        let temp_c = kelvin_to_celsius(self.t2m_k);
        RawSample {
            precip_mm_day: precip_m_to_mm_day(tp_m, dt_seconds),
            temp_c,
            rh: rh_from_dewpoint(temp_c, kelvin_to_celsius(self.d2m_k)),
            wind_m_s: wind_speed(self.u10, self.v10),
            net_radiation_w_m2: energy_to_flux(ssr, dt_seconds),
        }
    }
}

/// Accumulator readings at `t1` and the axis time they were read at.
struct NextAccumulators {
    tp_m: f64,
    ssr_j_m2: f64,
    axis_min: f64,
}

/// Point queries against ERA5.
///
/// A query at `T` reads hour `t0 = floor(T, 1 h)` and the accumulators at
/// `t1 = t0 + 1 h`, which may sit in the next day's file.
#[derive(Debug, Clone)]
pub struct Era5Adapter {
    source: ForcingSourceConfig,
    clock: ForcingClock,
    options: QueryOptions,
}

impl Era5Adapter {
    pub fn new(source: ForcingSourceConfig, clock: ForcingClock, options: QueryOptions) -> Self {
        Self {
            source,
            clock,
            options,
        }
    }

    pub fn source(&self) -> &ForcingSourceConfig {
        &self.source
    }

    /// Canonical sample for the hour containing `t_min`.
    ///
    /// # Errors
    ///
    /// [`ProductError::LookaheadBeyondAxis`] when `t1` should be in the same
    /// file but the axis ends at `t0`; [`ProductError::InvalidStep`] when
    /// the two resolved times are not a positive interval apart.
    pub fn resolve_sample(&self, station: &Station, t_min: f64) -> Result<CanonicalSample, ProductError> {
        let t0 = self.clock.floor_to_step(t_min, ERA5_STEP_MIN);
        let t1 = t0 + Duration::minutes(ERA5_STEP_MIN);
        let f0 = era5_day_file(&self.source, t0);
        let f1 = era5_day_file(&self.source, t1);
        let dims = self.source.dimensions();

        // First file: everything at t0, and t1 too when it is the same day.
        let (at_t0, cell, i0, t0_axis_min, next) = {
            let file = GridFile::open(&f0)?;
            let axes = file.grid_axes(dims)?;
            let cell = axes.locate(station.longitude_deg, station.latitude_deg);
            let axis = file.time_axis(&dims.time_var, self.clock.start())?;
            let i0 = axis.index_at(
                self.clock.minutes_since(t0),
                self.options.time_tolerance_min(),
                self.options.clamp(),
            )?;
            let read = |key: &str, ti: usize| require_value(&file, &self.source, key, ti, cell);

            let at_t0 = [
                read("TP", i0)?,
                read("SSR", i0)?,
                read("T2M", i0)?,
                read("D2M", i0)?,
                read("U10", i0)?,
                read("V10", i0)?,
            ];
            let next = if f1 == f0 {
                let i1 = i0 + 1;
                let Some(axis_min) = axis.get(i1) else {
                    return Err(ProductError::LookaheadBeyondAxis {
                        path: f0.clone(),
                        index: i0,
                        len: axis.len(),
                    });
                };
                Some(NextAccumulators {
                    tp_m: read("TP", i1)?,
                    ssr_j_m2: read("SSR", i1)?,
                    axis_min,
                })
            } else {
                None
            };
            let t0_axis_min = axis.get(i0).ok_or(TimeError::EmptyAxis)?;
            (at_t0, cell, i0, t0_axis_min, next)
        };

        let next = match next {
            Some(next) => next,
            None => {
                let file = GridFile::open(&f1)?;
                let axis = file.time_axis(&dims.time_var, self.clock.start())?;
                NextAccumulators {
                    tp_m: require_value(&file, &self.source, "TP", 0, cell)?,
                    ssr_j_m2: require_value(&file, &self.source, "SSR", 0, cell)?,
                    axis_min: axis.get(0).ok_or(TimeError::EmptyAxis)?,
                }
            }
        };

        let [tp0_m, ssr0_j_m2, t2m_k, d2m_k, u10, v10] = at_t0;
        let hour = Era5Hour {
            tp0_m,
            tp1_m: next.tp_m,
            ssr0_j_m2,
            ssr1_j_m2: next.ssr_j_m2,
            t2m_k,
            d2m_k,
            u10,
            v10,
        };

        let dt_seconds = (next.axis_min - t0_axis_min) * 60.0;
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return Err(ProductError::InvalidStep {
                dt_seconds,
                path: f0,
            });
        }
        debug!(
            station = station.index,
            t_min,
            i0,
            dt_seconds,
            crosses_day = f0 != f1,
            "ERA5 hour"
        );

        Ok(hour.to_raw_sample(dt_seconds).quantize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour() -> Era5Hour {
        Era5Hour {
            tp0_m: 0.001,
            tp1_m: 0.0015,
            ssr0_j_m2: 1.0e6,
            ssr1_j_m2: 2.8e6,
            t2m_k: 293.15,
            d2m_k: 283.15,
            u10: 3.0,
            v10: 4.0,
        }
    }

    #[test]
    fn hourly_conversion() {
        let s = hour().to_raw_sample(3600.0).quantize();
        assert_eq!(s.precip_mm_day, 12.0);
        assert_eq!(s.temp_c, 20.0);
        assert_eq!(s.wind_m_s, 5.0);
        assert_eq!(s.net_radiation_w_m2, 500.0);
        assert!(s.rh > 0.52 && s.rh < 0.53, "rh = {}", s.rh);
    }

    #[test]
    fn accumulator_reset_gives_value_since_reset() {
        let h = Era5Hour {
            tp0_m: 0.02,
            tp1_m: 0.01,
            ..hour()
        };
        let raw = h.to_raw_sample(3600.0);
        // 0.01 m over one hour.
        assert_eq!(raw.precip_mm_day, 0.01 * 1000.0 * 24.0);
    }

    #[test]
    fn calm_wind_is_floored() {
        let h = Era5Hour {
            u10: 0.0,
            v10: 0.01,
            ..hour()
        };
        assert_eq!(h.to_raw_sample(3600.0).quantize().wind_m_s, 0.05);
    }
}
