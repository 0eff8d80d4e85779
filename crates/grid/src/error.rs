//! Error types for the forcmatch-grid crate.

/// Error type for spatial lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when a coordinate array has no entries.
    #[error("coordinate '{name}' is empty")]
    EmptyCoordinate {
        /// Which coordinate (`lat` or `lon`).
        name: &'static str,
    },

    /// Returned when the expanding-ring search finds no valid cell.
    #[error(
        "no valid grid cell within {max_radius} cells of ({lat_index}, {lon_index}) \
         for station lon={lon} lat={lat}"
    )]
    NoValidGridCellFound {
        /// Station longitude in degrees.
        lon: f64,
        /// Station latitude in degrees.
        lat: f64,
        /// Latitude index of the nearest (invalid) cell.
        lat_index: usize,
        /// Longitude index of the nearest (invalid) cell.
        lon_index: usize,
        /// Largest ring radius searched.
        max_radius: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_coordinate() {
        let err = GridError::EmptyCoordinate { name: "lat" };
        assert_eq!(err.to_string(), "coordinate 'lat' is empty");
    }

    #[test]
    fn display_no_valid_cell() {
        let err = GridError::NoValidGridCellFound {
            lon: 100.5,
            lat: 30.25,
            lat_index: 4,
            lon_index: 7,
            max_radius: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("within 10 cells of (4, 7)"), "got: {msg}");
        assert!(msg.contains("lon=100.5 lat=30.25"), "got: {msg}");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<GridError>();
    }
}
