//! Legacy binary model output (`*.dat`).
//!
//! A 1024-byte opaque header, then little-endian `f64`s: the start time,
//! the column count `n`, `n` 1-based element ids, and records of
//! `time_min` followed by `n` values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IoError;

const HEADER_BYTES: usize = 1024;

/// A fully-read legacy binary output file.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyBinary {
    path: PathBuf,
    pub start_time: f64,
    /// 1-based element id of each column.
    pub column_ids: Vec<i64>,
    pub times_min: Vec<f64>,
    /// One row of `column_ids.len()` values per record.
    pub values: Vec<Vec<f64>>,
}

/// Sequential little-endian `f64` reader over an in-memory file.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl Cursor<'_> {
    fn f64(&mut self, what: &str) -> Result<f64, IoError> {
        let end = self.offset + 8;
        let Some(chunk) = self.bytes.get(self.offset..end) else {
            return Err(IoError::Truncated {
                path: self.path.to_path_buf(),
                offset: self.offset as u64,
                reason: format!("short {what}"),
            });
        };
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        self.offset = end;
        Ok(f64::from_le_bytes(buf))
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }
}

impl LegacyBinary {
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let bytes = std::fs::read(path).map_err(|e| IoError::io(path, e))?;
        Self::parse(&bytes, path)
    }

    /// Parse the bytes of a legacy binary file.
    ///
    /// # Errors
    ///
    /// [`IoError::Truncated`] when the header, the column table or a record
    /// is cut short. [`IoError::Config`] when the column count is not a
    /// non-negative whole number.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self, IoError> {
        if bytes.len() < HEADER_BYTES {
            return Err(IoError::Truncated {
                path: path.to_path_buf(),
                offset: 0,
                reason: format!("header is {} bytes, expected {HEADER_BYTES}", bytes.len()),
            });
        }
        let mut cur = Cursor {
            bytes,
            offset: HEADER_BYTES,
            path,
        };

        let start_time = cur.f64("start time")?;
        let raw_count = cur.f64("column count")?;
        if !raw_count.is_finite() || raw_count < 0.0 {
            return Err(IoError::config(
                path,
                0,
                format!("invalid column count {raw_count}"),
            ));
        }
        // The column table alone must fit in what is left of the file.
        let max_columns = cur.remaining() / 8;
        if raw_count.trunc() > max_columns as f64 {
            return Err(IoError::Truncated {
                path: path.to_path_buf(),
                offset: cur.offset as u64,
                reason: format!("column count {raw_count} exceeds the {max_columns} values left"),
            });
        }
        // Truncation toward zero, as the writer stores an integer.
        let num_var = raw_count as usize;

        let mut column_ids = Vec::with_capacity(num_var);
        for _ in 0..num_var {
            column_ids.push(cur.f64("column table")?.round() as i64);
        }

        let record_len = num_var
            .checked_add(1)
            .and_then(|n| n.checked_mul(8))
            .ok_or_else(|| IoError::config(path, 0, format!("column count {num_var} too large")))?;
        let mut times_min = Vec::new();
        let mut values = Vec::new();
        while cur.remaining() > 0 {
            if cur.remaining() < record_len {
                return Err(IoError::Truncated {
                    path: path.to_path_buf(),
                    offset: cur.offset as u64,
                    reason: format!(
                        "record needs {record_len} bytes, {} left",
                        cur.remaining()
                    ),
                });
            }
            times_min.push(cur.f64("record time")?);
            let mut row = Vec::with_capacity(num_var);
            for _ in 0..num_var {
                row.push(cur.f64("record value")?);
            }
            values.push(row);
        }

        debug!(
            path = %path.display(),
            columns = num_var,
            records = times_min.len(),
            "read legacy binary"
        );
        Ok(Self {
            path: path.to_path_buf(),
            start_time,
            column_ids,
            times_min,
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_var(&self) -> usize {
        self.column_ids.len()
    }

    /// Column position of each element id. A repeated id maps to its last
    /// column.
    pub fn column_index(&self) -> HashMap<i64, usize> {
        self.column_ids
            .iter()
            .enumerate()
            .map(|(j, id)| (*id, j))
            .collect()
    }
}

/// Index of the record time nearest to `target`.
///
/// Ties keep the earlier record.
///
/// # Errors
///
/// [`IoError::TimeNotFound`] when `times` is empty or the nearest record is
/// further than `tolerance` away.
pub fn find_time_index(times: &[f64], target: f64, tolerance: f64) -> Result<usize, IoError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, t) in times.iter().enumerate() {
        let err = (t - target).abs();
        if best.is_none_or(|(_, e)| err < e) {
            best = Some((i, err));
        }
    }
    match best {
        Some((i, err)) if err <= tolerance => Ok(i),
        _ => Err(IoError::TimeNotFound {
            target,
            tolerance,
            closest_error: best.map_or(f64::INFINITY, |(_, e)| e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(start: f64, ids: &[f64], records: &[&[f64]]) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_BYTES];
        let mut push = |v: f64| out.extend_from_slice(&v.to_le_bytes());
        push(start);
        push(ids.len() as f64);
        ids.iter().for_each(|v| push(*v));
        for rec in records {
            rec.iter().for_each(|v| push(*v));
        }
        out
    }

    #[test]
    fn parses_columns_and_records() {
        let bytes = encode(0.0, &[3.0, 7.0], &[&[60.0, 1.0, 2.0], &[120.0, 3.0, 4.0]]);
        let bin = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap();
        assert_eq!(bin.column_ids, vec![3, 7]);
        assert_eq!(bin.times_min, vec![60.0, 120.0]);
        assert_eq!(bin.values[1], vec![3.0, 4.0]);
        assert_eq!(bin.column_index()[&7], 1);
    }

    #[test]
    fn element_ids_are_rounded() {
        let bytes = encode(0.0, &[2.9999999], &[]);
        let bin = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap();
        assert_eq!(bin.column_ids, vec![3]);
        assert!(bin.times_min.is_empty());
    }

    #[test]
    fn short_header_is_truncated() {
        let err = LegacyBinary::parse(&[0u8; 100], Path::new("x.dat")).unwrap_err();
        assert!(matches!(err, IoError::Truncated { offset: 0, .. }));
    }

    #[test]
    fn partial_record_is_truncated() {
        let mut bytes = encode(0.0, &[1.0], &[&[60.0, 1.0]]);
        bytes.extend_from_slice(&60.0f64.to_le_bytes());
        let err = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap_err();
        match err {
            IoError::Truncated { offset, .. } => assert_eq!(offset, (HEADER_BYTES + 8 * 5) as u64),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absurd_column_count_is_rejected() {
        let mut bytes = vec![0u8; HEADER_BYTES];
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        bytes.extend_from_slice(&1e300f64.to_le_bytes());
        bytes.extend_from_slice(&1.0f64.to_le_bytes());
        let err = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap_err();
        assert!(matches!(err, IoError::Truncated { .. }), "got: {err}");

        // One id more than the file holds.
        let mut bytes = encode(0.0, &[1.0, 2.0], &[]);
        bytes[HEADER_BYTES + 8..HEADER_BYTES + 16].copy_from_slice(&3.0f64.to_le_bytes());
        let err = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap_err();
        assert!(matches!(err, IoError::Truncated { offset, .. } if offset == (HEADER_BYTES + 16) as u64));
    }

    #[test]
    fn repeated_element_id_uses_last_column() {
        let bytes = encode(0.0, &[5.0, 2.0, 5.0], &[&[60.0, 1.5, 2.5, 3.5]]);
        let bin = LegacyBinary::parse(&bytes, Path::new("x.dat")).unwrap();
        let index = bin.column_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&5], 2);
        assert_eq!(bin.values[0][index[&5]], 3.5);
        assert_eq!(index[&2], 1);
    }

    #[test]
    fn nearest_time_within_tolerance() {
        let times = [0.0, 60.0, 120.0];
        assert_eq!(find_time_index(&times, 60.0, 1e-6).unwrap(), 1);
        assert_eq!(find_time_index(&times, 90.0, 30.0).unwrap(), 1);
        assert!(matches!(
            find_time_index(&times, 61.0, 1e-6),
            Err(IoError::TimeNotFound { closest_error, .. }) if closest_error == 1.0
        ));
        assert!(find_time_index(&[], 0.0, 1.0).is_err());
    }
}
