//! `KEY VALUE` configuration files (`*.cfg.forcing`, `*.cfg.para`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::IoError;

/// A parsed `KEY VALUE` file.
///
/// One pair per line, `#` starts a comment line, blank lines are ignored.
/// Keys are upper-cased; the value is the first whitespace-separated token
/// after the key. Later duplicates overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvConfig {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KvConfig {
    /// Read and parse a file. A line with a key but no value is an error.
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse `text`, attributing errors to `path`.
    ///
    /// # Errors
    ///
    /// [`IoError::Config`] naming the line of any entry without a value.
    pub fn parse(text: &str, path: &Path) -> Result<Self, IoError> {
        Self::parse_with(text, path, true)
    }

    /// Parse `text`, silently skipping lines without a value.
    pub fn parse_lenient(text: &str, path: &Path) -> Self {
        // Only strict parsing can fail.
        Self::parse_with(text, path, false).unwrap_or_else(|_| Self {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
        })
    }

    fn parse_with(text: &str, path: &Path, strict: bool) -> Result<Self, IoError> {
        let mut entries = BTreeMap::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                if strict {
                    return Err(IoError::config(
                        path,
                        i + 1,
                        format!("invalid KEY VALUE line: {raw:?}"),
                    ));
                }
                continue;
            };
            entries.insert(key.to_uppercase(), value.to_string());
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// File the configuration was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of `key` (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_uppercase()).map(String::as_str)
    }

    /// Value of `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Value of `key`, which must be present.
    ///
    /// # Errors
    ///
    /// [`IoError::Config`] naming the missing key.
    pub fn require(&self, key: &str) -> Result<&str, IoError> {
        self.get(key)
            .ok_or_else(|| IoError::config(&self.path, 0, format!("missing key {}", key.to_uppercase())))
    }

    /// Boolean flag: absent, empty, `0`, `FALSE` and `false` are false.
    pub fn flag(&self, key: &str) -> bool {
        !matches!(self.get(key).map(str::trim), None | Some("" | "0" | "FALSE" | "false"))
    }

    /// Set or replace an entry.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_uppercase(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Simulation interval `(start, end)` in minutes from a `*.cfg.para` file.
///
/// `START` and `END` are given in days.
///
/// # Errors
///
/// [`IoError::Config`] when either key is missing or not a number.
pub fn read_para_interval(path: &Path) -> Result<(f64, f64), IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let cfg = KvConfig::parse_lenient(&text, path);
    let day = |key: &str| -> Result<f64, IoError> {
        let raw = cfg
            .get(key)
            .ok_or_else(|| IoError::config(path, 0, "missing START/END"))?;
        raw.parse::<f64>()
            .map_err(|_| IoError::config(path, 0, format!("{key} is not a number: {raw:?}")))
    };
    Ok((day("START")? * 1440.0, day("END")? * 1440.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> &'static Path {
        Path::new("prj.cfg.forcing")
    }

    #[test]
    fn keys_are_uppercased_and_first_token_kept() {
        let cfg = KvConfig::parse("# comment\n\nproduct CMFD2 trailing\nData_Root ../data\n", p())
            .unwrap();
        assert_eq!(cfg.get("PRODUCT"), Some("CMFD2"));
        assert_eq!(cfg.get("data_root"), Some("../data"));
        assert_eq!(cfg.len(), 2);
    }

    #[test]
    fn key_without_value_is_error() {
        let err = KvConfig::parse("PRODUCT ERA5\nDATA_ROOT\n", p()).unwrap_err();
        match err {
            IoError::Config { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lenient_skips_bare_keys() {
        let cfg = KvConfig::parse_lenient("START 0\nLONELY\nEND 2\n", p());
        assert_eq!(cfg.get("START"), Some("0"));
        assert_eq!(cfg.get("LONELY"), None);
    }

    #[test]
    fn require_names_missing_key() {
        let cfg = KvConfig::parse("PRODUCT GLDAS\n", p()).unwrap();
        let msg = cfg.require("layout_file_pattern").unwrap_err().to_string();
        assert!(msg.contains("missing key LAYOUT_FILE_PATTERN"), "got: {msg}");
    }

    #[test]
    fn flag_truthiness() {
        let cfg = KvConfig::parse("A 1\nB 0\nC FALSE\nD false\nE yes\nF False\n", p()).unwrap();
        assert!(cfg.flag("A"));
        assert!(!cfg.flag("B"));
        assert!(!cfg.flag("C"));
        assert!(!cfg.flag("D"));
        assert!(cfg.flag("E"));
        // Only the exact spellings above are false.
        assert!(cfg.flag("F"));
        assert!(!cfg.flag("MISSING"));
    }

    #[test]
    fn duplicates_overwrite() {
        let cfg = KvConfig::parse("X 1\nx 2\n", p()).unwrap();
        assert_eq!(cfg.get("X"), Some("2"));
    }
}
