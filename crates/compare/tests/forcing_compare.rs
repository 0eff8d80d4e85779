//! End-to-end forcing comparison over baseline and NetCDF run directories.

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use forcmatch_compare::{CompareError, ForcingCompareRequest, compare_forcing, write_json};
use forcmatch_io::{KvConfig, RunDir, StationRoster, write_station_csv};
use forcmatch_product::{ForcingSourceConfig, ProductAdapter, QueryOptions};
use forcmatch_quantize::{CanonicalSample, ForcingVariable};
use forcmatch_time::ForcingClock;
use tempfile::{TempDir, tempdir};

const PRJ: &str = "qhh";

const ROSTER: &str = "\
2 20000101
forcing
ID Lon Lat X Y Z Filename
1 100.1 30.2 0 0 0 st0.csv
2 102.9 31.8 0 0 0 st1.csv
";

const FORCING_CFG: &str = "\
# GLDAS 3-hourly
PRODUCT GLDAS
DATA_ROOT data
LAYOUT_FILE_PATTERN GLDAS_{yyyymmdd}.{hhmm}.nc4
NC_VAR_PREC Rainf_f_tavg
NC_VAR_TEMP Tair_f_inst
NC_VAR_SHUM Qair_f_inst
NC_VAR_PRES Psurf_f_inst
NC_VAR_WIND Wind_f_inst
NC_VAR_SRAD SWdown_f_tavg
";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Flat `[lat, lon]` values of the 4x4 grid.
fn grid(f: impl Fn(usize, usize) -> f64) -> Vec<f64> {
    (0..16).map(|i| f(i / 4, i % 4)).collect()
}

/// One GLDAS step on a 4x4 grid (lat 30..33, lon 100..103).
fn write_gldas_step(path: &Path, hour: f64) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", 4).unwrap();
    file.add_dimension("lon", 4).unwrap();
    {
        let mut v = file.add_variable::<f64>("time", &["time"]).unwrap();
        v.put_values(&[hour], ..).unwrap();
        v.put_attribute("units", "hours since 2000-01-01 00:00:00").unwrap();
    }
    file.add_variable::<f64>("lat", &["lat"])
        .unwrap()
        .put_values(&[30.0, 31.0, 32.0, 33.0], ..)
        .unwrap();
    file.add_variable::<f64>("lon", &["lon"])
        .unwrap()
        .put_values(&[100.0, 101.0, 102.0, 103.0], ..)
        .unwrap();

    let fields: [(&str, Option<&str>, Vec<f64>); 6] = [
        ("Rainf_f_tavg", Some("kg m-2 s-1"), grid(|_, j| 1e-5 * (j + 1) as f64)),
        ("Tair_f_inst", Some("K"), grid(|k, _| 280.15 + k as f64 + hour)),
        ("Qair_f_inst", None, grid(|_, _| 0.005)),
        ("Psurf_f_inst", None, grid(|_, _| 90_000.0)),
        ("Wind_f_inst", None, grid(|k, _| 1.0 + k as f64)),
        ("SWdown_f_tavg", None, grid(|_, _| 321.7)),
    ];
    for (name, units, data) in fields {
        let mut v = file.add_variable::<f64>(name, &["time", "lat", "lon"]).unwrap();
        if let Some(units) = units {
            v.put_attribute("units", units).unwrap();
        }
        v.put_values(&data, ..).unwrap();
    }
}

struct Runs {
    _dir: TempDir,
    baseline: RunDir,
    nc: RunDir,
}

/// Baseline and NetCDF runs whose station CSVs hold the NetCDF values,
/// except station 1 at 180 min, which is 0.5 degC warmer.
fn runs() -> Runs {
    let dir = tempdir().unwrap();
    let baseline = RunDir::new(dir.path().join("base"), PRJ);
    let nc = RunDir::new(dir.path().join("nc"), PRJ);
    fs::create_dir_all(baseline.input_dir()).unwrap();
    fs::create_dir_all(nc.input_dir()).unwrap();
    fs::write(baseline.roster(), ROSTER).unwrap();
    fs::write(nc.forcing_config(), FORCING_CFG).unwrap();

    let data = nc.root().join("data");
    fs::create_dir_all(&data).unwrap();
    write_gldas_step(&data.join("GLDAS_20000101.0000.nc4"), 0.0);
    write_gldas_step(&data.join("GLDAS_20000101.0300.nc4"), 3.0);

    let roster = StationRoster::read(&baseline.roster()).unwrap();
    let clock = ForcingClock::from_yyyymmdd(roster.forcing_start_yyyymmdd).unwrap();
    let kv = KvConfig::read(&nc.forcing_config()).unwrap();
    let source = ForcingSourceConfig::from_kv(&kv, nc.root()).unwrap();
    let adapter = ProductAdapter::new(source, clock, QueryOptions::default());
    for station in &roster.stations {
        let rows: Vec<(f64, CanonicalSample)> = [0.0, 180.0]
            .into_iter()
            .map(|t| {
                let mut s = adapter.resolve_sample(station, t).unwrap();
                if station.index == 1 && t == 180.0 {
                    s.temp_c += 0.5;
                }
                (t, s)
            })
            .collect();
        let path = roster.station_csv_path(baseline.root(), station);
        write_station_csv(&path, &clock, &rows).unwrap();
    }

    Runs {
        _dir: dir,
        baseline,
        nc,
    }
}

fn request(runs: &Runs) -> ForcingCompareRequest {
    ForcingCompareRequest::new(runs.baseline.root(), runs.nc.root(), PRJ)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn samples_stations_then_times() {
    let runs = runs();
    let report = compare_forcing(&request(&runs).with_stations(vec![0, 1])).unwrap();

    assert_eq!(report.forc_start_yyyymmdd, 20000101);
    assert_eq!(report.samples.len(), 4);
    let order: Vec<(usize, f64)> = report.samples.iter().map(|s| (s.station_idx0, s.t_min)).collect();
    assert_eq!(order, vec![(0, 0.0), (0, 180.0), (1, 0.0), (1, 180.0)]);

    let s0 = &report.samples[0];
    assert_eq!(s0.station_lon_deg, 100.1);
    assert_eq!(s0.nc.temp, 7.0);
    assert_abs_diff_eq!(s0.nc.precip, 0.864, epsilon = 1e-9);
    assert_eq!(s0.nc.net_radiation, 322.0);
    assert_eq!(report.samples[1].nc.temp, 10.0);
}

#[test]
fn diff_is_baseline_minus_nc() {
    let runs = runs();
    let report = compare_forcing(&request(&runs).with_stations(vec![0, 1])).unwrap();

    let warm = &report.samples[3];
    assert_abs_diff_eq!(warm.diff.temp, 0.5, epsilon = 1e-9);
    assert_eq!(warm.diff.precip, 0.0);

    let temp = report.summary.temp;
    assert_abs_diff_eq!(temp.max_abs, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(temp.mean, 0.125, epsilon = 1e-9);
    assert_eq!(report.summary.precip.max_abs, 0.0);

    let over = report.exceeding(0.1);
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].0, ForcingVariable::Temp);
    assert!(report.exceeding(1.0).is_empty());
}

#[test]
fn baseline_holds_last_row_between_steps() {
    let runs = runs();
    let report = compare_forcing(
        &request(&runs)
            .with_stations(vec![1])
            .with_times_min(vec![179.0, 200.0]),
    )
    .unwrap();
    // 179 min still reads the 0 min CSV row and the 00:00 GLDAS step.
    assert_eq!(report.samples[0].diff.temp, 0.0);
    assert_abs_diff_eq!(report.samples[1].diff.temp, 0.5, epsilon = 1e-9);
}

#[test]
fn station_past_roster_is_an_error() {
    let runs = runs();
    let err = compare_forcing(&request(&runs)).unwrap_err();
    assert!(matches!(err, CompareError::Io(_)), "got: {err}");
    assert!(err.to_string().contains("station index 2"), "got: {err}");
}

#[test]
fn missing_forcing_config() {
    let runs = runs();
    fs::remove_file(runs.nc.forcing_config()).unwrap();
    let err = compare_forcing(&request(&runs).with_stations(vec![0])).unwrap_err();
    assert!(err.to_string().contains("qhh.cfg.forcing"), "got: {err}");
}

#[test]
fn report_json_layout() {
    let runs = runs();
    let report = compare_forcing(&request(&runs).with_stations(vec![0])).unwrap();
    let out = runs.baseline.root().join("reports/forcing.json");
    let written = write_json(&out, &report).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(value["prj"], "qhh");
    assert_eq!(value["forc_start_yyyymmdd"], 20000101);
    assert_eq!(value["stations_idx0"], serde_json::json!([0]));
    assert_eq!(value["times_min"], serde_json::json!([0.0, 180.0]));
    assert_eq!(value["summary"]["Temp_C"]["max_abs"], 0.0);
    assert_eq!(value["samples"][1]["nc"]["Temp_C"], 10.0);
    assert!(value["samples"][0]["diff"].get("RN_W_m2").is_some());
}
