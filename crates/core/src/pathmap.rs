//! Mapping origin paths to their mirrored backup paths
//!
//! Pure path arithmetic: no filesystem access happens here.

use crate::error::MirrorError;
use std::path::{Path, PathBuf};

/// Compute the backup path mirroring `source`
///
/// Re-roots `source`'s path relative to `origin_root` under `backup_root`.
/// Fails with [`MirrorError::OutsideOrigin`] when `source` does not live
/// inside `origin_root`.
pub fn destination_for(
    source: &Path,
    origin_root: &Path,
    backup_root: &Path,
) -> Result<PathBuf, MirrorError> {
    let relative = source
        .strip_prefix(origin_root)
        .map_err(|_| MirrorError::OutsideOrigin {
            path: source.to_path_buf(),
            origin: origin_root.to_path_buf(),
        })?;

    Ok(backup_root.join(relative))
}

/// Normalize a path for display: forward slashes on every platform
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_relative_structure() {
        let dest = destination_for(
            Path::new("/origin/sub/dir/file.txt"),
            Path::new("/origin"),
            Path::new("/backup"),
        )
        .unwrap();

        assert_eq!(dest, Path::new("/backup/sub/dir/file.txt"));
    }

    #[test]
    fn test_root_level_file() {
        let dest = destination_for(
            Path::new("/origin/a.txt"),
            Path::new("/origin"),
            Path::new("/backup"),
        )
        .unwrap();

        assert_eq!(dest, Path::new("/backup/a.txt"));
    }

    #[test]
    fn test_rejects_path_outside_origin() {
        let err = destination_for(
            Path::new("/elsewhere/file.txt"),
            Path::new("/origin"),
            Path::new("/backup"),
        )
        .unwrap_err();

        assert!(matches!(err, MirrorError::OutsideOrigin { .. }));
    }

    #[test]
    fn test_rejects_sibling_prefix() {
        // "/origin-other" shares a string prefix but is a different tree
        let result = destination_for(
            Path::new("/origin-other/file.txt"),
            Path::new("/origin"),
            Path::new("/backup"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_display_path_normalizes_separators() {
        assert_eq!(display_path(Path::new("a/b/c.txt")), "a/b/c.txt");
        // Backslashes can appear in strings passed through from Windows paths
        let mixed = PathBuf::from("a\\b\\c.txt");
        assert_eq!(display_path(&mixed), "a/b/c.txt");
    }
}
