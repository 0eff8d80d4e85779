//! Run-directory layout: `<run>/input/<prj>/<prj>.<suffix>`.

use std::path::{Path, PathBuf};

/// Input files of one project inside a model run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    root: PathBuf,
    prj: String,
}

impl RunDir {
    pub fn new(root: impl Into<PathBuf>, prj: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prj: prj.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prj(&self) -> &str {
        &self.prj
    }

    /// `<run>/input/<prj>`.
    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input").join(&self.prj)
    }

    fn input_file(&self, suffix: &str) -> PathBuf {
        self.input_dir().join(format!("{}.{suffix}", self.prj))
    }

    /// Station roster, `<prj>.tsd.forc`.
    pub fn roster(&self) -> PathBuf {
        self.input_file("tsd.forc")
    }

    /// Forcing source configuration, `<prj>.cfg.forcing`.
    pub fn forcing_config(&self) -> PathBuf {
        self.input_file("cfg.forcing")
    }

    /// Model parameters, `<prj>.cfg.para`.
    pub fn para(&self) -> PathBuf {
        self.input_file("cfg.para")
    }
}
