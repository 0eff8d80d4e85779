//! Per-variable quantisation rules.
//!
//! The order inside each function (sanitise, round, re-clamp or floor) is
//! significant at boundary values and must not be rearranged.

/// Precipitation below this after rounding is reported as exactly zero.
pub const MIN_PRECIP_MM_DAY: f64 = 0.0001;

/// Calmest wind speed ever reported.
pub const MIN_WIND_M_S: f64 = 0.05;

/// Round to `decimals` places, ties to even.
pub fn round_half_even(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

pub fn quantize_precip(mm_day: f64) -> f64 {
    let x = if mm_day.is_finite() && mm_day >= 0.0 {
        mm_day
    } else {
        0.0
    };
    let x = round_half_even(x, 4);
    if x < MIN_PRECIP_MM_DAY { 0.0 } else { x }
}

pub fn quantize_temp(temp_c: f64) -> f64 {
    round_half_even(finite_or_zero(temp_c), 2)
}

pub fn quantize_rh(rh: f64) -> f64 {
    let x = finite_or_zero(rh).clamp(0.0, 1.0);
    round_half_even(x, 4).clamp(0.0, 1.0)
}

pub fn quantize_wind(wind_m_s: f64) -> f64 {
    let x = round_half_even(finite_or_zero(wind_m_s).abs(), 2);
    if x < MIN_WIND_M_S { MIN_WIND_M_S } else { x }
}

pub fn quantize_radiation(w_m2: f64) -> f64 {
    let x = finite_or_zero(w_m2);
    let x = if x < 0.0 { 0.0 } else { x };
    round_half_even(x, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_half_even(0.5, 0), 0.0);
        assert_eq!(round_half_even(1.5, 0), 2.0);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(-2.5, 0), -2.0);
    }

    #[test]
    fn precip_sanitised_and_thresholded() {
        assert_eq!(quantize_precip(f64::NAN), 0.0);
        assert_eq!(quantize_precip(-1.0), 0.0);
        assert_eq!(quantize_precip(0.00004), 0.0);
        assert_eq!(quantize_precip(0.00006), 0.0001);
        assert_eq!(quantize_precip(2.16), 2.16);
    }

    #[test]
    fn temp_non_finite_is_zero() {
        assert_eq!(quantize_temp(f64::INFINITY), 0.0);
        assert_eq!(quantize_temp(-3.14159), -3.14);
    }

    #[test]
    fn rh_reclamped() {
        assert_eq!(quantize_rh(1.04), 1.0);
        assert_eq!(quantize_rh(-0.2), 0.0);
        assert_eq!(quantize_rh(0.99996), 1.0);
        assert_eq!(quantize_rh(f64::NAN), 0.0);
    }

    #[test]
    fn wind_floor_and_abs() {
        assert_eq!(quantize_wind(0.0), 0.05);
        assert_eq!(quantize_wind(-3.0), 3.0);
        assert_eq!(quantize_wind(0.044), 0.05);
        assert_eq!(quantize_wind(f64::NAN), 0.05);
    }

    #[test]
    fn radiation_whole_watts() {
        assert_eq!(quantize_radiation(-5.0), 0.0);
        assert_eq!(quantize_radiation(123.5), 124.0);
        assert_eq!(quantize_radiation(122.5), 122.0);
    }
}
