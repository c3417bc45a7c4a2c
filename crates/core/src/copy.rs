//! Version-preserving single-file copy
//!
//! The copy never destroys destination data: any existing destination file
//! is archived (renamed aside) before the new bytes land.

use crate::archive::archive_if_exists;
use crate::error::MirrorError;
use crate::pathmap::destination_for;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a [`sync_copy`] call did
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Where the file was written
    pub destination: PathBuf,
    /// The renamed prior version, when one existed
    pub archived: Option<PathBuf>,
}

/// Copy one file from the origin tree into the backup tree
///
/// Returns `Ok(None)` when `source` is not a regular file (directories and
/// special files are ignored; so is a path that vanished before we got to
/// it). Otherwise:
/// 1. maps `source` to its backup path,
/// 2. creates intermediate destination directories,
/// 3. archives any existing destination file,
/// 4. copies content and carries the source modification time over.
pub fn sync_copy(
    source: &Path,
    origin_root: &Path,
    backup_root: &Path,
) -> Result<Option<SyncOutcome>, MirrorError> {
    if !source.is_file() {
        return Ok(None);
    }

    let destination = destination_for(source, origin_root, backup_root)?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let archived = archive_if_exists(&destination)?;

    fs::copy(source, &destination)?;
    copy_mtime(source, &destination)?;

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        archived = archived.is_some(),
        "synchronized file"
    );

    Ok(Some(SyncOutcome {
        destination,
        archived,
    }))
}

/// Carry the source's modification time onto the destination
fn copy_mtime(source: &Path, destination: &Path) -> std::io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(destination, mtime)
}
