//! Precipitation unit detection.

use std::path::Path;

use crate::error::ProductError;

/// A recognised precipitation rate unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipUnit {
    /// kg m-2 s-1 (numerically mm/s).
    KgM2S,
    /// mm s-1.
    MmS,
    /// mm hr-1.
    MmHr,
    /// mm day-1.
    MmDay,
}

impl PrecipUnit {
    /// Multiplier taking a value in this unit to mm/day.
    pub fn mm_day_factor(self) -> f64 {
        match self {
            Self::KgM2S | Self::MmS => 86_400.0,
            Self::MmHr => 24.0,
            Self::MmDay => 1.0,
        }
    }

    /// Detect a CMFD2 precipitation unit from a `units` attribute.
    ///
    /// Substring heuristics, tried in order: kg/m²/s, mm/hr, mm/day.
    pub fn detect_cmfd2(units: &str) -> Option<Self> {
        let u = units.trim().to_lowercase();
        if is_kg_m2_s(&u) {
            return Some(Self::KgM2S);
        }
        if u.contains("mm") && (u.contains("hr") || u.contains("h-1") || u.contains("h**-1")) {
            return Some(Self::MmHr);
        }
        if is_mm_day(&u) {
            return Some(Self::MmDay);
        }
        None
    }

    /// Detect a GLDAS precipitation unit: kg/m²/s, mm/s, mm/day.
    pub fn detect_gldas(units: &str) -> Option<Self> {
        let u = units.trim().to_lowercase();
        if is_kg_m2_s(&u) {
            return Some(Self::KgM2S);
        }
        if u.contains("mm") && per_second(&u) {
            return Some(Self::MmS);
        }
        if is_mm_day(&u) {
            return Some(Self::MmDay);
        }
        None
    }

    /// Parse a `CMFD_PRECIP_UNITS` override. `AUTO` or empty means detect.
    ///
    /// # Errors
    ///
    /// [`ProductError::InvalidConfig`] for any other spelling.
    pub fn parse_override(raw: &str) -> Result<Option<Self>, ProductError> {
        match raw.trim().to_uppercase().as_str() {
            "" | "AUTO" => Ok(None),
            "KG_M2_S" => Ok(Some(Self::KgM2S)),
            "MM_HR" | "MM/HR" | "MM_H-1" => Ok(Some(Self::MmHr)),
            "MM_DAY" | "MM/DAY" | "MM_D-1" => Ok(Some(Self::MmDay)),
            other => Err(ProductError::InvalidConfig {
                reason: format!("invalid CMFD_PRECIP_UNITS override {other:?}"),
            }),
        }
    }
}

fn per_second(u: &str) -> bool {
    u.contains("s-1") || u.contains("s**-1")
}

fn is_kg_m2_s(u: &str) -> bool {
    u.contains("kg") && (u.contains("m-2") || u.contains("m**-2")) && per_second(u)
}

fn is_mm_day(u: &str) -> bool {
    u.contains("mm") && (u.contains("day") || u.contains("d-1") || u.contains("d**-1"))
}

/// Pick the precipitation unit: the override if set, else `detect(units)`.
///
/// # Errors
///
/// [`ProductError::UnknownPrecipUnits`] when detection fails.
pub(crate) fn resolve_precip_unit(
    override_unit: Option<PrecipUnit>,
    detect: fn(&str) -> Option<PrecipUnit>,
    units: Option<&str>,
    var: &str,
    path: &Path,
) -> Result<PrecipUnit, ProductError> {
    if let Some(unit) = override_unit {
        return Ok(unit);
    }
    let units = units.unwrap_or("");
    detect(units).ok_or_else(|| ProductError::UnknownPrecipUnits {
        units: units.to_string(),
        var: var.to_string(),
        path: path.to_path_buf(),
    })
}
