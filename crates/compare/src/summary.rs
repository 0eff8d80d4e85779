//! Difference statistics.

use serde::Serialize;

/// Signed and absolute statistics of one variable's differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariableSummary {
    pub max_abs: f64,
    pub mean: f64,
    pub mean_abs: f64,
}

impl VariableSummary {
    /// All zero when `diffs` is empty.
    pub fn of(diffs: &[f64]) -> Self {
        if diffs.is_empty() {
            return Self {
                max_abs: 0.0,
                mean: 0.0,
                mean_abs: 0.0,
            };
        }
        let n = diffs.len() as f64;
        Self {
            max_abs: diffs.iter().map(|d| d.abs()).fold(0.0, f64::max),
            mean: diffs.iter().sum::<f64>() / n,
            mean_abs: diffs.iter().map(|d| d.abs()).sum::<f64>() / n,
        }
    }
}

/// Absolute statistics of a single-variable output comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputSummary {
    pub count: usize,
    pub max_abs: f64,
    pub mean_abs: f64,
}

impl OutputSummary {
    pub fn of(diffs: &[f64]) -> Self {
        let VariableSummary {
            max_abs, mean_abs, ..
        } = VariableSummary::of(diffs);
        Self {
            count: diffs.len(),
            max_abs,
            mean_abs,
        }
    }
}
