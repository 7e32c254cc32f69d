//! Element Path Mapper
//!
//! Maps an element id to its on-disk location. Pure, no shared state.

use std::path::{Path, PathBuf};

/// Low-order bits of the id selecting the shard directory (64 shards)
pub const SHARD_MASK: u64 = 0x3f;

/// Suffix for element files whose write has not been published yet
pub const TEMP_SUFFIX: &str = ".tmp";

/// Shard directory name for an id: `id & 0x3f` in lowercase hex
///
/// 0x1234 → "34", 0x40 → "0"
pub fn shard_name(id: u64) -> String {
    format!("{:x}", id & SHARD_MASK)
}

/// File name for an id: the full id in lowercase hex, unpadded
pub fn file_name(id: u64) -> String {
    format!("{:x}", id)
}

/// Parse an element id from a file name
///
/// Accepts hex digits only (either case). Signs, `0x` prefixes, suffixes and
/// empty names are rejected so stray files never masquerade as elements.
pub fn parse_element_id(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(name, 16).ok()
}

/// Resolves element paths under a store root
#[derive(Debug, Clone)]
pub struct ElementLayout {
    root: PathBuf,
}

impl ElementLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<shard>`
    pub fn shard_dir(&self, id: u64) -> PathBuf {
        self.root.join(shard_name(id))
    }

    /// `<root>/<shard>/<id>`
    pub fn element_path(&self, id: u64) -> PathBuf {
        self.shard_dir(id).join(file_name(id))
    }

    /// `<root>/<shard>/<id>.tmp`, renamed to `element_path` once written
    pub fn temp_path(&self, id: u64) -> PathBuf {
        self.shard_dir(id)
            .join(format!("{}{}", file_name(id), TEMP_SUFFIX))
    }
}
