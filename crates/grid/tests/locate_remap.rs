use approx::assert_abs_diff_eq;
use forcmatch_grid::{
    DEFAULT_MAX_REMAP_RADIUS, GridAxes, GridCellIndex, GridError, LonConvention, remap_search,
};

fn regular(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

#[test]
fn negative_station_longitude_matches_positive_grid() {
    let axes = GridAxes::new(regular(-5.0, 0.5, 21), regular(0.0, 0.25, 1440)).unwrap();
    assert_eq!(axes.convention(), LonConvention::Positive360);

    for lat in [-4.9, 0.0, 3.3] {
        assert_eq!(axes.locate(-10.0, lat), axes.locate(350.0, lat));
    }
    assert_eq!(axes.locate(-10.0, 0.0).lon_index, 1400);
}

#[test]
fn signed_grid_uses_station_longitude_unchanged() {
    let axes = GridAxes::new(regular(30.0, 0.1, 10), regular(-180.0, 1.0, 360)).unwrap();
    assert_eq!(axes.convention(), LonConvention::Signed180);
    assert_eq!(axes.locate(-10.0, 30.0).lon_index, 170);
}

#[test]
fn remap_picks_closest_cell_in_first_successful_ring() {
    // 1-degree grid, station at (lon 5.2, lat 5.0): nearest cell (5, 5).
    let axes = GridAxes::new(regular(0.0, 1.0, 11), regular(0.0, 1.0, 11)).unwrap();
    let start = axes.locate(5.2, 5.0);
    assert_eq!(start, GridCellIndex::new(5, 5));

    // Ring 1 entirely masked; three valid cells at radius 2. (3, 3) comes
    // first in scan order, (5, 7) is 1.8 degrees away and the closest.
    let valid = [
        GridCellIndex::new(3, 3),
        GridCellIndex::new(4, 7),
        GridCellIndex::new(5, 7),
    ];
    let mut probes = 0;
    let got = remap_search(&axes, 5.2, 5.0, start, DEFAULT_MAX_REMAP_RADIUS, |c| {
        probes += 1;
        valid.contains(&c)
    })
    .unwrap();

    assert_eq!(got, GridCellIndex::new(5, 7));
    assert_abs_diff_eq!(axes.distance2(5.2, 5.0, got).sqrt(), 1.8, epsilon = 1e-12);
    // Rings 1 and 2 scanned in full, nothing beyond.
    assert_eq!(probes, 9 + 25);
}

#[test]
fn remap_distance_wraps_across_the_date_line() {
    // Irregular 0..360 grid. The station at lon -0.5 (359.5) is nearest to
    // column 2 (lon 359); column 0 (lon 0) is only 0.5 degrees away once the
    // separation wraps.
    let axes = GridAxes::new(regular(0.0, 1.0, 5), vec![0.0, 300.0, 359.0]).unwrap();
    let start = axes.locate(-0.5, 2.0);
    assert_eq!(start, GridCellIndex::new(2, 2));

    // Ring 1 (columns 1..=2) is fully masked. In ring 2 the lon-300 cell is
    // scanned first but the wrapped lon-0 cell is far closer.
    let valid = [GridCellIndex::new(0, 1), GridCellIndex::new(2, 0)];
    let got = remap_search(&axes, -0.5, 2.0, start, DEFAULT_MAX_REMAP_RADIUS, |c| {
        valid.contains(&c)
    })
    .unwrap();
    assert_eq!(got, GridCellIndex::new(2, 0));
}

#[test]
fn remap_failure_reports_station() {
    let axes = GridAxes::new(regular(0.0, 1.0, 3), regular(0.0, 1.0, 3)).unwrap();
    let err = remap_search(&axes, 1.0, 1.0, GridCellIndex::new(1, 1), 10, |_| false).unwrap_err();
    assert_eq!(
        err,
        GridError::NoValidGridCellFound {
            lon: 1.0,
            lat: 1.0,
            lat_index: 1,
            lon_index: 1,
            max_radius: 10,
        }
    );
}
