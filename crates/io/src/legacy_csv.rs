//! Legacy per-station forcing CSV.
//!
//! ```text
//! <rows>\t6\t<start YYYYMMDD>\t<end YYYYMMDD>\t86400
//! Time_interval\tPrecip_mm.d\tTemp_C\tRH_1\tWind_m.s\tRN_w.m2
//! <time_day>\t<precip>\t<temp>\t<rh>\t<wind>\t<radiation>
//! ```
//!
//! `time_day * 1440` is minutes since the forcing start. Rows hold until
//! the next row starts.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use forcmatch_quantize::{CanonicalSample, ForcingVariable};
use forcmatch_time::{ForcingClock, yyyymmdd};
use tracing::debug;

use crate::error::IoError;

/// Row start times are matched with this slack, in minutes.
const ROW_TIME_TOLERANCE_MIN: f64 = 1e-9;

const COLUMN_HEADER: &str = "Time_interval\tPrecip_mm.d\tTemp_C\tRH_1\tWind_m.s\tRN_w.m2";

/// A fully-read station CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCsv {
    path: PathBuf,
    rows: Vec<(f64, CanonicalSample)>,
}

impl StationCsv {
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse CSV text. The first two lines are headers and are not checked.
    ///
    /// # Errors
    ///
    /// [`IoError::Config`] for a row with fewer than six fields, a
    /// non-numeric field, or a file without data rows.
    pub fn parse(text: &str, path: &Path) -> Result<Self, IoError> {
        let mut rows = Vec::new();
        for (i, raw) in text.lines().enumerate().skip(2) {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 {
                return Err(IoError::config(
                    path,
                    i + 1,
                    format!("invalid forcing csv row: {raw:?}"),
                ));
            }
            let mut nums = [0.0f64; 6];
            for (slot, field) in nums.iter_mut().zip(&fields[..6]) {
                *slot = field.parse().map_err(|_| {
                    IoError::config(path, i + 1, format!("invalid number: {field:?}"))
                })?;
            }
            let [time_day, values @ ..] = nums;
            rows.push((time_day * 1440.0, CanonicalSample::from_values(values)));
        }
        if rows.is_empty() {
            return Err(IoError::config(path, 0, "no data rows in forcing csv"));
        }
        debug!(path = %path.display(), rows = rows.len(), "read station csv");
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows as `(minutes since forcing start, values)`.
    pub fn rows(&self) -> &[(f64, CanonicalSample)] {
        &self.rows
    }

    /// Values in force at `t_min`: the last row starting at or before it,
    /// or the first row when `t_min` precedes every row.
    pub fn value_at(&self, t_min: f64) -> CanonicalSample {
        let count = self
            .rows
            .partition_point(|(t, _)| *t <= t_min + ROW_TIME_TOLERANCE_MIN);
        let i = count.saturating_sub(1);
        // Non-empty by construction.
        self.rows[i].1
    }
}

/// Write one station's series in the legacy CSV layout.
///
/// `rows` are `(minutes since forcing start, sample)`. The end date in the
/// header is the calendar day of the last row. Values are printed with the
/// quantisation decimals of each variable.
///
/// # Errors
///
/// [`IoError::Config`] for an empty series, [`IoError::Io`] for write
/// failures.
pub fn write_station_csv(
    path: &Path,
    clock: &ForcingClock,
    rows: &[(f64, CanonicalSample)],
) -> Result<(), IoError> {
    let Some(&(last_min, _)) = rows.last() else {
        return Err(IoError::config(path, 0, "empty time axis for station csv"));
    };
    let end = yyyymmdd(clock.at(last_min).date());

    let mut out = String::with_capacity(64 + rows.len() * 48);
    let _ = writeln!(
        out,
        "{}\t6\t{}\t{end}\t86400",
        rows.len(),
        clock.start_yyyymmdd()
    );
    out.push_str(COLUMN_HEADER);
    out.push('\n');
    for (t_min, sample) in rows {
        let time_day = t_min / 1440.0;
        let _ = write!(out, "{time_day:?}");
        for var in ForcingVariable::ALL {
            let _ = write!(out, "\t{:.*}", var.decimals(), sample.get(var));
        }
        out.push('\n');
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| IoError::io(parent, e))?;
    }
    let mut file = std::fs::File::create(path).map_err(|e| IoError::io(path, e))?;
    file.write_all(out.as_bytes())
        .map_err(|e| IoError::io(path, e))?;
    debug!(path = %path.display(), rows = rows.len(), "wrote station csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
3\t6\t20000101\t20000101\t86400
Time_interval\tPrecip_mm.d\tTemp_C\tRH_1\tWind_m.s\tRN_w.m2
0.0\t1.0\t10.00\t0.5000\t2.00\t100
0.125\t2.0\t11.00\t0.6000\t3.00\t200
0.25\t3.0\t12.00\t0.7000\t4.00\t300
";

    fn csv() -> StationCsv {
        StationCsv::parse(CSV, Path::new("st.csv")).unwrap()
    }

    #[test]
    fn step_function_lookup() {
        let c = csv();
        assert_eq!(c.value_at(0.0).precip_mm_day, 1.0);
        assert_eq!(c.value_at(179.9).precip_mm_day, 1.0);
        assert_eq!(c.value_at(180.0).precip_mm_day, 2.0);
        assert_eq!(c.value_at(10_000.0).precip_mm_day, 3.0);
    }

    #[test]
    fn before_first_row_returns_first() {
        let text = CSV
            .replace("0.0\t1.0", "0.5\t9.0")
            .replace("0.125\t", "0.75\t")
            .replace("0.25\t", "1.0\t");
        let c = StationCsv::parse(&text, Path::new("st.csv")).unwrap();
        assert_eq!(c.value_at(0.0).precip_mm_day, 9.0);
    }

    #[test]
    fn short_row_is_error() {
        let text = "h\nh\n0.0\t1\t2\t3\t4\n";
        assert!(StationCsv::parse(text, Path::new("st.csv")).is_err());
    }

    #[test]
    fn empty_table_is_error() {
        let text = "h\nh\n\n# nothing\n";
        let err = StationCsv::parse(text, Path::new("st.csv")).unwrap_err();
        assert!(err.to_string().contains("no data rows"), "got: {err}");
    }
}
