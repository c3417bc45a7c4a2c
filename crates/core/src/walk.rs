//! One-time gap-fill pass over the origin tree
//!
//! Runs before the watcher is armed. Copies only files that are entirely
//! absent from the backup tree; existing backup files are left untouched,
//! which makes the pass idempotent and safe to re-run.

use crate::error::MirrorError;
use crate::events::{emit, StatusEvent, StatusSink};
use crate::pathmap::destination_for;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Counters from an initial sync pass
#[derive(Debug, Default, Clone, Copy)]
pub struct InitialSyncReport {
    /// Files copied because they were absent from the backup tree
    pub copied: usize,
    /// Files skipped because the backup already had them
    pub skipped: usize,
    /// Files whose copy failed (logged and reported, walk continued)
    pub failed: usize,
}

/// Fill backup-tree gaps from the origin tree
///
/// Enumerates every regular file under `origin_root` (symlinks not
/// followed). For each file absent from the backup, creates parent
/// directories and copies content plus modification time. Never archives
/// and never overwrites. Per-file failures are reported through the sink
/// and counted; only a failure to read the origin root itself aborts.
pub fn initial_sync(
    origin_root: &Path,
    backup_root: &Path,
    sink: &StatusSink,
) -> Result<InitialSyncReport, MirrorError> {
    let mut report = InitialSyncReport::default();

    info!(origin = %origin_root.display(), backup = %backup_root.display(), "initial sync starting");

    for entry in WalkDir::new(origin_root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(origin_root).to_path_buf();
                warn!(path = %path.display(), error = %e, "initial sync: unreadable entry");
                emit(sink, StatusEvent::error(&path, e.to_string()));
                report.failed += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let destination = destination_for(entry.path(), origin_root, backup_root)?;

        if destination.exists() {
            report.skipped += 1;
            continue;
        }

        match gap_fill_copy(entry.path(), &destination) {
            Ok(()) => {
                emit(sink, StatusEvent::synchronized(&destination));
                report.copied += 1;
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "initial sync: copy failed");
                emit(sink, StatusEvent::error(entry.path(), e.to_string()));
                report.failed += 1;
            }
        }
    }

    info!(
        copied = report.copied,
        skipped = report.skipped,
        failed = report.failed,
        "initial sync finished"
    );

    Ok(report)
}

/// Copy one absent file, creating parents and carrying the mtime
fn gap_fill_copy(source: &Path, destination: &Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(source, destination)?;

    let metadata = fs::metadata(source)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(destination, mtime)
}
