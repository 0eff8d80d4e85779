//! Simulation interval and output step grid.

use std::path::Path;

use forcmatch_io::read_para_interval;

use crate::error::BatchError;

/// Simulation interval in minutes after the forcing start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimInterval {
    pub start_min: f64,
    pub end_min: f64,
}

impl SimInterval {
    /// Checked interval.
    ///
    /// # Errors
    ///
    /// [`BatchError::InvalidInterval`] unless both ends are finite,
    /// non-negative and ordered.
    pub fn new(start_min: f64, end_min: f64) -> Result<Self, BatchError> {
        let ok = start_min.is_finite() && end_min.is_finite() && start_min >= 0.0 && start_min <= end_min;
        if !ok {
            return Err(BatchError::InvalidInterval { start_min, end_min });
        }
        Ok(Self { start_min, end_min })
    }

    /// Interval from the `START`/`END` days of a `*.cfg.para` file.
    pub fn from_para(path: &Path) -> Result<Self, BatchError> {
        let (start, end) = read_para_interval(path)?;
        Self::new(start, end)
    }
}

/// Output rows `k * step_min` for `k in 0..len`.
///
/// The last row covers `[t, t + step)`, so `len = max(1, ceil(end / step))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSteps {
    step_min: i64,
    len: usize,
}

impl OutputSteps {
    pub fn covering(interval: &SimInterval, step_min: i64) -> Self {
        let steps = (interval.end_min / step_min as f64).ceil();
        // `SimInterval` guarantees a finite, non-negative end.
        let len = (steps as usize).max(1);
        Self { step_min, len }
    }

    pub fn step_min(&self) -> i64 {
        self.step_min
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Minutes of step `k`.
    pub fn time_min(&self, k: usize) -> f64 {
        k as f64 * self.step_min as f64
    }

    pub fn times_min(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(|k| self.time_min(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_cover_the_interval_end() {
        let run = SimInterval::new(0.0, 1440.0).unwrap();
        let hourly = OutputSteps::covering(&run, 60);
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly.time_min(23), 1380.0);

        let partial = SimInterval::new(0.0, 1441.0).unwrap();
        assert_eq!(OutputSteps::covering(&partial, 180).len(), 9);
    }

    #[test]
    fn zero_length_run_still_has_one_row() {
        let run = SimInterval::new(0.0, 0.0).unwrap();
        let steps = OutputSteps::covering(&run, 180);
        assert_eq!(steps.times_min().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn bad_intervals() {
        assert!(SimInterval::new(10.0, 5.0).is_err());
        assert!(SimInterval::new(-1.0, 5.0).is_err());
        assert!(SimInterval::new(0.0, f64::NAN).is_err());
    }
}
