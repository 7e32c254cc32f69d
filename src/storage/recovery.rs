//! Startup Recovery
//!
//! Rebuilds the set of durable element ids by walking the store root.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

use super::path::{parse_element_id, TEMP_SUFFIX};

/// Result of a recovery scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Number of element files recognized
    pub elements_recovered: u64,

    /// Regular files whose names are not element ids
    pub entries_skipped: u64,

    /// Unpublished `.tmp` files left by writes that never completed
    pub partial_writes: u64,
}

/// Scans a store root for element files
pub struct RecoveryScanner;

impl RecoveryScanner {
    /// Walk `root` recursively and collect every element id found
    ///
    /// Files with unparseable names are skipped, not treated as errors.
    /// Only a failure to read a directory aborts the scan.
    pub fn scan(root: &Path) -> Result<(HashSet<u64>, RecoveryReport)> {
        let mut ids = HashSet::new();
        let mut report = RecoveryReport::default();
        Self::visit(root, &mut ids, &mut report)?;
        Ok((ids, report))
    }

    fn visit(dir: &Path, ids: &mut HashSet<u64>, report: &mut RecoveryReport) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                Self::visit(&entry.path(), ids, report)?;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            match parse_element_id(&name) {
                Some(id) => {
                    if ids.insert(id) {
                        report.elements_recovered += 1;
                    }
                }
                None if name.ends_with(TEMP_SUFFIX) => report.partial_writes += 1,
                None => report.entries_skipped += 1,
            }
        }
        Ok(())
    }
}
