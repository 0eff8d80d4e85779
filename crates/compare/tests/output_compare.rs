//! Legacy binary output against a NetCDF output variable.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use forcmatch_compare::{CompareError, OutputCompareRequest, compare_output, to_json};
use forcmatch_io::IoError;
use tempfile::{TempDir, tempdir};

const TIMES: [f64; 3] = [0.0, 60.0, 120.0];
const COLUMN_IDS: [f64; 3] = [1.0, 2.0, 4.0];
const MESH: usize = 5;

/// Value of element `id` (1-based) at record `r`.
fn value(r: usize, id: usize) -> f64 {
    10.0 * id as f64 + r as f64 * 0.5
}

fn legacy_bytes() -> Vec<u8> {
    let mut doubles = vec![0.0, COLUMN_IDS.len() as f64];
    doubles.extend(COLUMN_IDS);
    for (r, &t) in TIMES.iter().enumerate() {
        doubles.push(t);
        doubles.extend(COLUMN_IDS.iter().map(|&id| value(r, id as usize)));
    }
    let mut bytes = vec![0u8; 1024];
    for d in doubles {
        bytes.extend_from_slice(&d.to_le_bytes());
    }
    bytes
}

/// NetCDF output with `yGw(time, mesh)` and `yLayer(time, mesh, layer)`.
/// Element 4 at record 1 is off by 0.25.
fn write_netcdf(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", TIMES.len()).unwrap();
    file.add_dimension("mesh", MESH).unwrap();
    file.add_dimension("layer", 2).unwrap();
    file.add_variable::<f64>("time", &["time"])
        .unwrap()
        .put_values(&TIMES, ..)
        .unwrap();

    let mut flat = Vec::with_capacity(TIMES.len() * MESH);
    for r in 0..TIMES.len() {
        for m in 0..MESH {
            let off = if r == 1 && m == 3 { 0.25 } else { 0.0 };
            flat.push(value(r, m + 1) - off);
        }
    }
    file.add_variable::<f64>("yGw", &["time", "mesh"])
        .unwrap()
        .put_values(&flat, ..)
        .unwrap();

    let layered: Vec<f64> = flat.iter().flat_map(|&v| [v, -1.0]).collect();
    file.add_variable::<f64>("yLayer", &["time", "mesh", "layer"])
        .unwrap()
        .put_values(&layered, ..)
        .unwrap();
}

struct Fixture {
    _dir: TempDir,
    legacy: PathBuf,
    netcdf: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let legacy = dir.path().join("qhh.rivqdown.dat");
    let netcdf = dir.path().join("qhh.nc");
    std::fs::write(&legacy, legacy_bytes()).unwrap();
    write_netcdf(&netcdf);
    Fixture {
        _dir: dir,
        legacy,
        netcdf,
    }
}

impl Fixture {
    fn request(&self, var: &str) -> OutputCompareRequest {
        OutputCompareRequest::new(&self.legacy, &self.netcdf, var)
    }
}

#[test]
fn defaults_sample_first_records_and_columns() {
    let fx = fixture();
    let report = compare_output(&fx.request("yGw")).unwrap();

    assert_eq!(report.obj_dim, "mesh");
    assert_eq!(report.time_dim, "time");
    assert_eq!(report.samples.len(), 6);
    let keys: Vec<(f64, i64)> = report.samples.iter().map(|s| (s.t_min, s.index_1based)).collect();
    assert_eq!(
        keys,
        vec![(0.0, 1), (0.0, 2), (0.0, 4), (60.0, 1), (60.0, 2), (60.0, 4)]
    );
    assert_eq!(report.samples[5].legacy, 40.5);
    assert_abs_diff_eq!(report.samples[5].diff, 0.25, epsilon = 1e-12);

    assert_eq!(report.summary.count, 6);
    assert_abs_diff_eq!(report.summary.max_abs, 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(report.summary.mean_abs, 0.25 / 6.0, epsilon = 1e-12);
}

#[test]
fn indices_without_a_column_are_skipped() {
    let fx = fixture();
    let report = compare_output(
        &fx.request("yGw")
            .with_times_min(Some(vec![120.0]))
            .with_indices(Some(vec![3, 2])),
    )
    .unwrap();
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].index_1based, 2);
    assert_eq!(report.samples[0].t_min, 120.0);
    assert_eq!(report.samples[0].diff, 0.0);
}

#[test]
fn object_dimension_must_be_named_when_ambiguous() {
    let fx = fixture();
    let err = compare_output(&fx.request("yLayer")).unwrap_err();
    assert!(
        matches!(err, CompareError::AmbiguousObjectDimension { .. }),
        "got: {err}"
    );

    let report = compare_output(&fx.request("yLayer").with_obj_dim(Some("mesh".to_string()))).unwrap();
    assert_eq!(report.summary.count, 6);
    assert_abs_diff_eq!(report.summary.max_abs, 0.25, epsilon = 1e-12);
}

#[test]
fn unknown_object_dimension() {
    let fx = fixture();
    let err = compare_output(&fx.request("yGw").with_obj_dim(Some("cell".to_string()))).unwrap_err();
    assert!(
        matches!(err, CompareError::Io(IoError::MissingDimension { ref dim, .. }) if dim == "cell"),
        "got: {err}"
    );
}

#[test]
fn unmatched_time_is_an_error() {
    let fx = fixture();
    let err = compare_output(&fx.request("yGw").with_times_min(Some(vec![30.0]))).unwrap_err();
    assert!(
        matches!(err, CompareError::Io(IoError::TimeNotFound { .. })),
        "got: {err}"
    );
}

#[test]
fn report_json_layout() {
    let fx = fixture();
    let report = compare_output(&fx.request("yGw").with_indices(Some(vec![1]))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
    assert_eq!(value["var"], "yGw");
    assert_eq!(value["obj_dim"], "mesh");
    assert_eq!(value["summary"]["count"], 2);
    assert_eq!(value["samples"][0]["index_1based"], 1);
    assert_eq!(value["samples"][0]["netcdf"], 10.0);
    assert!(value["legacy_bin"].as_str().unwrap().ends_with("qhh.rivqdown.dat"));
}
