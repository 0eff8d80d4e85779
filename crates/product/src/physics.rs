//! Unit conversions and derived quantities shared by the product adapters.

/// Offset between kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}

/// Relative humidity (fraction) from surface pressure (Pa), specific
/// humidity (kg/kg) and air temperature (K).
///
/// `RH% = 0.263 * P * q / exp(17.67 * (T - 273.15) / (T - 29.65))`,
/// clamped to `[0, 100]` before dividing by 100.
pub fn rh_from_specific_humidity(pressure_pa: f64, q_kg_kg: f64, temp_k: f64) -> f64 {
    let percent = 0.263 * pressure_pa * q_kg_kg
        / (17.67 * (temp_k - KELVIN_OFFSET) / (temp_k - 29.65)).exp();
    percent.clamp(0.0, 100.0) / 100.0
}

/// Saturation vapour pressure (hPa) over water at `temp_c` (Magnus form).
pub fn saturation_vapour_pressure(temp_c: f64) -> f64 {
    6.112 * (17.67 * temp_c / (temp_c + 243.5)).exp()
}

/// Relative humidity (fraction) from air and dewpoint temperature (°C).
///
/// A non-positive or non-finite saturation pressure gives 0; a negative or
/// non-finite actual pressure counts as 0.
pub fn rh_from_dewpoint(temp_c: f64, dew_c: f64) -> f64 {
    let es = saturation_vapour_pressure(temp_c);
    if !es.is_finite() || es <= 0.0 {
        return 0.0;
    }
    let ea = saturation_vapour_pressure(dew_c);
    let ea = if ea.is_finite() && ea >= 0.0 { ea } else { 0.0 };
    let rh = ea / es;
    if rh.is_finite() {
        rh.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Reset tolerance for an accumulated field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulation {
    /// Smallest tolerated negative difference, in field units.
    pub absolute_floor: f64,
    /// Tolerance as a fraction of the larger magnitude of the two values.
    pub relative_fraction: f64,
}

impl Accumulation {
    /// ERA5 total precipitation, metres.
    pub const PRECIP_M: Self = Self {
        absolute_floor: 1e-5,
        relative_fraction: 1e-4,
    };

    /// ERA5 surface net solar radiation, J/m².
    pub const RADIATION_J_M2: Self = Self {
        absolute_floor: 1000.0,
        relative_fraction: 1e-4,
    };

    /// Increment between two consecutive accumulator readings.
    ///
    /// A difference no more negative than the tolerance is ordinary
    /// accumulation (negative noise becomes 0). A larger drop means the
    /// accumulator was reset, and the increment is the value since reset.
    pub fn increment(self, v0: f64, v1: f64) -> f64 {
        let diff = v1 - v0;
        let tolerance = self
            .absolute_floor
            .max(self.relative_fraction * v0.abs().max(v1.abs()));
        if diff >= -tolerance {
            diff.max(0.0)
        } else {
            v1.max(0.0)
        }
    }
}

/// Accumulated precipitation (m) over `dt_seconds` as a rate in mm/day.
pub fn precip_m_to_mm_day(increment_m: f64, dt_seconds: f64) -> f64 {
    increment_m * 1000.0 * (SECONDS_PER_DAY / dt_seconds)
}

/// Accumulated energy (J/m²) over `dt_seconds` as a flux in W/m².
pub fn energy_to_flux(increment_j_m2: f64, dt_seconds: f64) -> f64 {
    increment_j_m2 / dt_seconds
}

pub fn wind_speed(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt()
}
