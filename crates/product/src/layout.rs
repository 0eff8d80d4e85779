//! Source file naming for each product family.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDateTime};
use glob::glob;
use tracing::debug;

use crate::config::ForcingSourceConfig;
use crate::error::ProductError;

/// The single file matching a glob pattern.
///
/// # Errors
///
/// [`ProductError::AmbiguousSourceFile`] unless exactly one file matches;
/// [`ProductError::InvalidConfig`] for a malformed pattern.
pub fn resolve_single_glob(pattern: &str) -> Result<PathBuf, ProductError> {
    let mut matches: Vec<PathBuf> = glob(pattern)
        .map_err(|e| ProductError::InvalidConfig {
            reason: format!("invalid file pattern {pattern:?}: {e}"),
        })?
        .filter_map(Result::ok)
        .collect();
    matches.sort();
    if matches.len() != 1 {
        return Err(ProductError::AmbiguousSourceFile {
            pattern: pattern.to_string(),
            count: matches.len(),
        });
    }
    Ok(matches.remove(0))
}

/// CMFD2 monthly file for a variable key, resolved by glob.
///
/// `DATA_ROOT/<LAYOUT_VAR_DIR_KEY>/<pattern>` with `{var_lower}` and
/// `{yyyymm}` substituted.
pub fn cmfd2_file(
    cfg: &ForcingSourceConfig,
    key: &str,
    instant: NaiveDateTime,
) -> Result<PathBuf, ProductError> {
    let var = cfg.variable(key)?;
    let dir = cfg.variable_dir(key)?;
    let name = cfg
        .file_pattern()
        .replace("{var_lower}", &var.to_lowercase())
        .replace("{yyyymm}", &instant.format("%Y%m").to_string());
    let pattern = cfg.data_root().join(dir).join(name);
    let path = resolve_single_glob(&pattern.to_string_lossy())?;
    debug!(key, path = %path.display(), "resolved CMFD2 file");
    Ok(path)
}

/// ERA5 daily file holding `instant`'s day.
pub fn era5_day_file(cfg: &ForcingSourceConfig, instant: NaiveDateTime) -> PathBuf {
    let name = cfg
        .file_pattern()
        .replace("{yyyymmdd}", &instant.format("%Y%m%d").to_string());
    if cfg.year_subdir() {
        cfg.data_root()
            .join(format!("{:04}", instant.year()))
            .join(name)
    } else {
        cfg.data_root().join(name)
    }
}

/// GLDAS 3-hourly file of the step starting at `step`.
///
/// Placeholders: `{year}`/`{yyyy}`, `{doy}` (3 digits), `{yyyymmdd}`, `{hhmm}`.
pub fn gldas_step_file(cfg: &ForcingSourceConfig, step: NaiveDateTime) -> PathBuf {
    let name = cfg
        .file_pattern()
        .replace("{year}", &step.format("%Y").to_string())
        .replace("{yyyy}", &step.format("%Y").to_string())
        .replace("{doy}", &format!("{:03}", step.ordinal()))
        .replace("{yyyymmdd}", &step.format("%Y%m%d").to_string())
        .replace("{hhmm}", &step.format("%H%M").to_string());
    cfg.data_root().join(name)
}
