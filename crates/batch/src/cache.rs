//! Per-file bounding-box slab cache.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::path::{Path, PathBuf};

use forcmatch_grid::BoundingBox;
use forcmatch_io::{DimensionNames, GridFile, Slab};
use tracing::debug;

use crate::error::BatchError;

/// Slabs of several variables read from one file over one bounding box,
/// plus each variable's `units` attribute.
#[derive(Debug)]
pub struct FileSlabs {
    path: PathBuf,
    slabs: BTreeMap<String, Slab>,
    units: BTreeMap<String, Option<String>>,
}

impl FileSlabs {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slab(&self, var: &str) -> Result<&Slab, BatchError> {
        self.slabs.get(var).ok_or_else(|| BatchError::SlabNotLoaded {
            var: var.to_string(),
            path: self.path.clone(),
        })
    }

    pub fn units(&self, var: &str) -> Option<&str> {
        self.units.get(var).and_then(|u| u.as_deref())
    }

    /// Time steps held, taken from the shortest slab.
    pub fn time_len(&self) -> usize {
        self.slabs.values().map(Slab::time_len).min().unwrap_or(0)
    }
}

/// Which time steps of a file to slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSelection {
    /// Every step on the file's time axis.
    All,
    /// A fixed index range.
    Range(Range<usize>),
}

/// Bounding-box slabs keyed by resolved file path.
///
/// The file handle is closed as soon as the slabs are read; the decoded
/// arrays stay until [`SlabCache::evict`].
#[derive(Debug, Default)]
pub struct SlabCache {
    entries: HashMap<PathBuf, FileSlabs>,
}

impl SlabCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slabs of `vars` in `path`, read on first use.
    pub fn load(
        &mut self,
        path: &Path,
        vars: &[&str],
        dims: &DimensionNames,
        time: &TimeSelection,
        bbox: &BoundingBox,
    ) -> Result<&FileSlabs, BatchError> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => Ok(e.insert(read_file_slabs(path, vars, dims, time, bbox)?)),
        }
    }

    /// Drop the slabs of `path`. Returns whether anything was cached.
    pub fn evict(&mut self, path: &Path) -> bool {
        let removed = self.entries.remove(path).is_some();
        if removed {
            debug!(path = %path.display(), "evicted slabs");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_file_slabs(
    path: &Path,
    vars: &[&str],
    dims: &DimensionNames,
    time: &TimeSelection,
    bbox: &BoundingBox,
) -> Result<FileSlabs, BatchError> {
    let file = GridFile::open(path)?;
    let time = match time {
        TimeSelection::All => 0..file.read_1d(&[dims.time_var.as_str(), dims.time_dim.as_str()])?.len(),
        TimeSelection::Range(r) => r.clone(),
    };
    let mut slabs = BTreeMap::new();
    let mut units = BTreeMap::new();
    for &var in vars {
        slabs.insert(var.to_string(), file.read_slab(var, dims, time.clone(), bbox)?);
        units.insert(var.to_string(), file.units(var)?);
    }
    debug!(
        path = %path.display(),
        vars = vars.len(),
        steps = time.len(),
        lat = ?bbox.lat,
        lon = ?bbox.lon,
        "loaded slabs"
    );
    Ok(FileSlabs {
        path: path.to_path_buf(),
        slabs,
        units,
    })
}
