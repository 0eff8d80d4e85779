//! JSON report output and summary number formatting.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::CompareError;
use crate::forcing::absolute;

/// Pretty-printed JSON of a report.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, CompareError> {
    serde_json::to_string_pretty(report).map_err(|e| CompareError::Serialization {
        reason: e.to_string(),
    })
}

/// Write `report` as JSON to `path`, creating parent directories.
///
/// Returns the absolute path written.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<PathBuf, CompareError> {
    let out = absolute(path)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CompareError::file(parent, e))?;
    }
    let mut json = to_json(report)?;
    json.push('\n');
    std::fs::write(&out, json).map_err(|e| CompareError::file(&out, e))?;
    info!(path = %out.display(), "wrote JSON report");
    Ok(out)
}

/// `x` with `precision` significant digits, printf `%g` style: trailing
/// zeros dropped, scientific notation for exponents below -4 or at least
/// `precision`.
pub fn format_g(x: f64, precision: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
