//! Version archiving of destination files
//!
//! Before a destination file is overwritten, it is renamed in place with a
//! wall-clock timestamp suffix so the prior content survives as a sibling.
//! Archived files are never deleted by the engine.

use crate::error::MirrorError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp format embedded in archived file names (second resolution)
const ARCHIVE_STAMP_FORMAT: &str = "%y-%m-%d_%H-%M-%S";

/// Archive `dest` if it exists, returning the archived path
///
/// No-op returning `Ok(None)` when `dest` does not exist. Otherwise the
/// file is renamed to `<stem>_<YY-MM-DD_HH-MM-SS><.ext>` in the same
/// directory. Two archives of the same file within one second would
/// produce the same name; a `-N` sequence suffix is appended until the
/// name is free, so an earlier archive is never overwritten.
pub fn archive_if_exists(dest: &Path) -> Result<Option<PathBuf>, MirrorError> {
    if !dest.exists() {
        return Ok(None);
    }

    let stamp = Local::now().format(ARCHIVE_STAMP_FORMAT).to_string();
    let archived = unique_archive_path(dest, &stamp);

    fs::rename(dest, &archived)?;
    debug!(from = %dest.display(), to = %archived.display(), "archived prior version");

    Ok(Some(archived))
}

/// Build an archive path that does not collide with an existing file
///
/// Starts from `<stem>_<stamp><.ext>`; on collision appends `-1`, `-2`, ...
/// to the stamp until the name is free.
fn unique_archive_path(dest: &Path, stamp: &str) -> PathBuf {
    let candidate = stamped_sibling(dest, stamp);
    if !candidate.exists() {
        return candidate;
    }

    for seq in 1u32.. {
        let candidate = stamped_sibling(dest, &format!("{stamp}-{seq}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    unreachable!("archive sequence space exhausted")
}

/// Insert `_<stamp>` between `dest`'s stem and extension
fn stamped_sibling(dest: &Path, stamp: &str) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match dest.extension() {
        Some(ext) => format!("{stem}_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{stamp}"),
    };

    dest.with_file_name(name)
}
