//! Element File I/O
//!
//! Write-once element files and whole-file reads.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use bytes::Bytes;

use crate::config::WriteSyncStrategy;

use super::path::ElementLayout;

/// Owner-only directory permissions
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Owner-only file permissions
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Create `path` and any missing parents with owner-only permissions
pub fn create_dir_private(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

/// Persist one element
///
/// Steps:
/// 1. Create the shard directory if absent
/// 2. Write the value to `<id>.tmp`, replacing any leftover from a crash
/// 3. fsync if the strategy asks for it
/// 4. Rename to `<id>` so the element appears complete or not at all
///
/// On failure the temp file is removed on a best-effort basis.
pub fn write_element(
    layout: &ElementLayout,
    id: u64,
    value: &[u8],
    strategy: WriteSyncStrategy,
) -> io::Result<()> {
    create_dir_private(&layout.shard_dir(id))?;

    let temp_path = layout.temp_path(id);
    let result = write_temp(&temp_path, value, strategy)
        .and_then(|()| fs::rename(&temp_path, layout.element_path(id)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(path: &Path, value: &[u8], strategy: WriteSyncStrategy) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(value)?;
    if strategy == WriteSyncStrategy::EveryWrite {
        file.sync_all()?;
    }
    Ok(())
}

/// Read a whole element file
pub fn read_element(layout: &ElementLayout, id: u64) -> io::Result<Bytes> {
    let mut file = File::open(layout.element_path(id))?;
    let mut buf = Vec::with_capacity(file.metadata().map(|m| m.len() as usize).unwrap_or(0));
    file.read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}
