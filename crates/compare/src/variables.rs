//! Per-variable values keyed like the legacy CSV columns.

use forcmatch_quantize::{CanonicalSample, ForcingVariable};
use serde::Serialize;

/// One value per forcing variable, serialized with the canonical keys in
/// column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerVariable<T> {
    #[serde(rename = "Precip_mm_day")]
    pub precip: T,
    #[serde(rename = "Temp_C")]
    pub temp: T,
    #[serde(rename = "RH_1")]
    pub rh: T,
    #[serde(rename = "Wind_m_s")]
    pub wind: T,
    #[serde(rename = "RN_W_m2")]
    pub net_radiation: T,
}

impl<T> PerVariable<T> {
    pub fn from_fn(mut f: impl FnMut(ForcingVariable) -> T) -> Self {
        Self {
            precip: f(ForcingVariable::Precip),
            temp: f(ForcingVariable::Temp),
            rh: f(ForcingVariable::RelativeHumidity),
            wind: f(ForcingVariable::Wind),
            net_radiation: f(ForcingVariable::NetRadiation),
        }
    }

    pub fn get(&self, var: ForcingVariable) -> &T {
        match var {
            ForcingVariable::Precip => &self.precip,
            ForcingVariable::Temp => &self.temp,
            ForcingVariable::RelativeHumidity => &self.rh,
            ForcingVariable::Wind => &self.wind,
            ForcingVariable::NetRadiation => &self.net_radiation,
        }
    }

    /// `(variable, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (ForcingVariable, &T)> {
        ForcingVariable::ALL.into_iter().map(move |v| (v, self.get(v)))
    }
}

impl From<CanonicalSample> for PerVariable<f64> {
    fn from(sample: CanonicalSample) -> Self {
        Self::from_fn(|v| sample.get(v))
    }
}

/// Element-wise `a - b`.
pub fn difference(a: &PerVariable<f64>, b: &PerVariable<f64>) -> PerVariable<f64> {
    PerVariable::from_fn(|v| a.get(v) - b.get(v))
}
