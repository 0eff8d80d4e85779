//! Raw and canonical forcing samples.

use crate::rules::{quantize_precip, quantize_radiation, quantize_rh, quantize_temp, quantize_wind};

/// The five forcing variables, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForcingVariable {
    Precip,
    Temp,
    RelativeHumidity,
    Wind,
    NetRadiation,
}

impl ForcingVariable {
    pub const ALL: [ForcingVariable; 5] = [
        ForcingVariable::Precip,
        ForcingVariable::Temp,
        ForcingVariable::RelativeHumidity,
        ForcingVariable::Wind,
        ForcingVariable::NetRadiation,
    ];

    /// Report key for this variable.
    pub fn key(self) -> &'static str {
        match self {
            Self::Precip => "Precip_mm_day",
            Self::Temp => "Temp_C",
            Self::RelativeHumidity => "RH_1",
            Self::Wind => "Wind_m_s",
            Self::NetRadiation => "RN_W_m2",
        }
    }

    /// Decimal places kept by quantisation and by the legacy CSV writer.
    pub fn decimals(self) -> usize {
        match self {
            Self::Precip | Self::RelativeHumidity => 4,
            Self::Temp | Self::Wind => 2,
            Self::NetRadiation => 0,
        }
    }
}

/// Physical values after unit conversion, before quantisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub precip_mm_day: f64,
    pub temp_c: f64,
    pub rh: f64,
    pub wind_m_s: f64,
    pub net_radiation_w_m2: f64,
}

impl RawSample {
    /// Apply the per-variable quantisation rules.
    pub fn quantize(self) -> CanonicalSample {
        CanonicalSample {
            precip_mm_day: quantize_precip(self.precip_mm_day),
            temp_c: quantize_temp(self.temp_c),
            rh: quantize_rh(self.rh),
            wind_m_s: quantize_wind(self.wind_m_s),
            net_radiation_w_m2: quantize_radiation(self.net_radiation_w_m2),
        }
    }
}

/// The quantised five-variable forcing record every adapter produces.
///
/// `precip_mm_day >= 0`, `rh` in `[0, 1]`, `wind_m_s >= 0.05`,
/// `net_radiation_w_m2 >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalSample {
    pub precip_mm_day: f64,
    pub temp_c: f64,
    pub rh: f64,
    pub wind_m_s: f64,
    pub net_radiation_w_m2: f64,
}

impl CanonicalSample {
    /// Build from five values already in canonical form, e.g. a legacy CSV row.
    pub fn from_values(values: [f64; 5]) -> Self {
        let [precip_mm_day, temp_c, rh, wind_m_s, net_radiation_w_m2] = values;
        Self {
            precip_mm_day,
            temp_c,
            rh,
            wind_m_s,
            net_radiation_w_m2,
        }
    }

    pub fn get(&self, var: ForcingVariable) -> f64 {
        match var {
            ForcingVariable::Precip => self.precip_mm_day,
            ForcingVariable::Temp => self.temp_c,
            ForcingVariable::RelativeHumidity => self.rh,
            ForcingVariable::Wind => self.wind_m_s,
            ForcingVariable::NetRadiation => self.net_radiation_w_m2,
        }
    }

    /// Values in column order.
    pub fn values(&self) -> [f64; 5] {
        ForcingVariable::ALL.map(|v| self.get(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_applies_every_rule() {
        let raw = RawSample {
            precip_mm_day: 2.5e-5 * 86400.0,
            temp_c: 21.456,
            rh: 1.04,
            wind_m_s: 0.0,
            net_radiation_w_m2: -3.0,
        };
        let q = raw.quantize();
        assert_eq!(q.precip_mm_day, 2.16);
        assert_eq!(q.temp_c, 21.46);
        assert_eq!(q.rh, 1.0);
        assert_eq!(q.wind_m_s, 0.05);
        assert_eq!(q.net_radiation_w_m2, 0.0);
    }

    #[test]
    fn column_order_and_keys() {
        let keys: Vec<&str> = ForcingVariable::ALL.iter().map(|v| v.key()).collect();
        assert_eq!(keys, ["Precip_mm_day", "Temp_C", "RH_1", "Wind_m_s", "RN_W_m2"]);
        let s = CanonicalSample::from_values([1.0, 2.0, 0.5, 3.0, 4.0]);
        assert_eq!(s.values(), [1.0, 2.0, 0.5, 3.0, 4.0]);
        assert_eq!(s.get(ForcingVariable::Wind), 3.0);
    }
}
