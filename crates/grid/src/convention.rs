//! Longitude convention detection and normalisation.

/// How a grid expresses longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonConvention {
    /// `-180..180` (also used for any grid that is not clearly `0..360`).
    Signed180,
    /// `0..360`.
    Positive360,
}

impl LonConvention {
    /// Classify a longitude coordinate array.
    ///
    /// A grid is `0..360` when every longitude is non-negative and the
    /// largest exceeds 180.
    pub fn detect(lons: &[f64]) -> Self {
        let (min, max) = lons
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min >= 0.0 && max > 180.0 {
            Self::Positive360
        } else {
            Self::Signed180
        }
    }

    /// Express a station longitude in this convention.
    pub fn normalize(self, lon: f64) -> f64 {
        match self {
            Self::Signed180 => lon,
            Self::Positive360 => {
                let shifted = if lon < 0.0 { lon + 360.0 } else { lon };
                if shifted >= 360.0 {
                    shifted.rem_euclid(360.0)
                } else {
                    shifted
                }
            }
        }
    }

    /// Absolute longitude separation, wrapping around the date line for
    /// `0..360` grids.
    pub fn lon_distance(self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        match self {
            Self::Signed180 => d,
            Self::Positive360 => d.min(360.0 - d),
        }
    }
}
