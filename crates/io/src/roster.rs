//! Station roster (`*.tsd.forc`).

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::IoError;

/// One forcing station. Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// 0-based position in the roster.
    pub index: usize,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    /// Per-station CSV file name.
    pub filename: String,
}

/// The station roster: forcing start date, output path and stations.
///
/// ```text
/// <count> <forcing start YYYYMMDD>
/// <relative path of the station CSV files>
/// <reserved>
/// ID Lon Lat X Y Z Filename
/// ...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StationRoster {
    pub forcing_start_yyyymmdd: u32,
    /// Station CSV directory, relative to the run directory.
    pub relative_path: String,
    pub stations: Vec<Station>,
}

impl StationRoster {
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
        let roster = Self::parse(&text, path)?;
        info!(
            path = %path.display(),
            stations = roster.stations.len(),
            forcing_start = roster.forcing_start_yyyymmdd,
            "read station roster"
        );
        Ok(roster)
    }

    /// Parse roster text, attributing errors to `path`.
    ///
    /// # Errors
    ///
    /// [`IoError::Config`] for an empty file, a bad header, a station
    /// record with fewer than seven fields or non-numeric coordinates, or a
    /// station count that disagrees with the header.
    pub fn parse(text: &str, path: &Path) -> Result<Self, IoError> {
        let lines: Vec<&str> = text.lines().collect();
        let header = lines
            .first()
            .ok_or_else(|| IoError::config(path, 0, "empty station roster"))?;

        let head: Vec<&str> = header.split_whitespace().collect();
        let [count, start, ..] = head.as_slice() else {
            return Err(IoError::config(path, 1, format!("invalid header: {header:?}")));
        };
        let count: usize = count
            .parse()
            .map_err(|_| IoError::config(path, 1, format!("invalid station count: {count:?}")))?;
        let forcing_start_yyyymmdd: u32 = start
            .parse()
            .map_err(|_| IoError::config(path, 1, format!("invalid forcing start: {start:?}")))?;

        let relative_path = lines.get(1).map_or("", |l| l.trim()).to_string();

        let mut stations = Vec::with_capacity(count);
        for (i, raw) in lines.iter().enumerate().skip(3) {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 7 {
                return Err(IoError::config(
                    path,
                    i + 1,
                    format!("invalid station record: {raw:?}"),
                ));
            }
            let coord = |s: &str| {
                s.parse::<f64>()
                    .map_err(|_| IoError::config(path, i + 1, format!("invalid coordinate: {s:?}")))
            };
            stations.push(Station {
                index: stations.len(),
                longitude_deg: coord(fields[1])?,
                latitude_deg: coord(fields[2])?,
                filename: fields[6].to_string(),
            });
        }

        if stations.len() != count {
            return Err(IoError::config(
                path,
                1,
                format!(
                    "station count mismatch: header={count}, parsed={}",
                    stations.len()
                ),
            ));
        }

        Ok(Self {
            forcing_start_yyyymmdd,
            relative_path,
            stations,
        })
    }

    /// Station CSV directory resolved against the run directory.
    pub fn output_dir(&self, run_dir: &Path) -> PathBuf {
        if self.relative_path.is_empty() {
            return run_dir.to_path_buf();
        }
        run_dir.join(&self.relative_path)
    }

    /// Path of a station's CSV file, `<run_dir>/<relative path>/<filename>`.
    pub fn station_csv_path(&self, run_dir: &Path, station: &Station) -> PathBuf {
        self.output_dir(run_dir).join(&station.filename)
    }

    /// Station by 0-based index.
    ///
    /// # Errors
    ///
    /// [`IoError::Config`] if the index is past the end of the roster.
    pub fn station(&self, index: usize) -> Result<&Station, IoError> {
        self.stations.get(index).ok_or_else(|| {
            IoError::config(
                "station roster",
                0,
                format!(
                    "station index {index} out of range ({} stations)",
                    self.stations.len()
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
2 20000101
forcing/csv
ID Lon Lat X Y Z Filename
1 100.25 36.5 0 0 3000 st_1.csv

# comment
2 -10.0 40.0 0 0 10 st_2.csv
";

    #[test]
    fn parses_header_and_stations() {
        let r = StationRoster::parse(ROSTER, Path::new("prj.tsd.forc")).unwrap();
        assert_eq!(r.forcing_start_yyyymmdd, 20000101);
        assert_eq!(r.relative_path, "forcing/csv");
        assert_eq!(r.stations.len(), 2);
        assert_eq!(r.stations[1].index, 1);
        assert_eq!(r.stations[1].longitude_deg, -10.0);
        assert_eq!(r.stations[1].filename, "st_2.csv");
    }

    #[test]
    fn count_mismatch_is_error() {
        let text = ROSTER.replacen("2 20000101", "3 20000101", 1);
        let err = StationRoster::parse(&text, Path::new("prj.tsd.forc")).unwrap_err();
        assert!(err.to_string().contains("header=3, parsed=2"), "got: {err}");
    }

    #[test]
    fn short_record_is_error() {
        let text = "1 20000101\n.\nhdr\n1 100 30 0 0 st.csv\n";
        assert!(StationRoster::parse(text, Path::new("x")).is_err());
    }

    #[test]
    fn csv_path_resolves_against_run_dir() {
        let r = StationRoster::parse(ROSTER, Path::new("prj.tsd.forc")).unwrap();
        let p = r.station_csv_path(Path::new("/runs/base"), &r.stations[0]);
        assert_eq!(p, PathBuf::from("/runs/base/forcing/csv/st_1.csv"));
    }

    #[test]
    fn station_index_out_of_range() {
        let r = StationRoster::parse(ROSTER, Path::new("prj.tsd.forc")).unwrap();
        assert!(r.station(1).is_ok());
        assert!(r.station(2).is_err());
    }
}
