//! Mirror configuration
//!
//! Two roots: where to watch and where to mirror. Persisted as TOML by the
//! front end; the engine only requires both to be non-empty before it
//! starts.

use crate::error::MirrorError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The two tree roots the engine mirrors between
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Source root to watch (absolute or relative)
    #[serde(default)]
    pub origin: String,

    /// Destination root to mirror into
    #[serde(default)]
    pub backup: String,
}

impl MirrorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, MirrorError> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| MirrorError::Config(format!("invalid config file: {e}")))
    }

    /// Save configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), MirrorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| MirrorError::Config(format!("could not serialize config: {e}")))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject configurations the engine cannot start with
    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.origin.is_empty() {
            return Err(MirrorError::Config(
                "'origin' is not set; configure the source root first".into(),
            ));
        }
        if self.backup.is_empty() {
            return Err(MirrorError::Config(
                "'backup' is not set; configure the destination root first".into(),
            ));
        }
        Ok(())
    }

    pub fn origin_path(&self) -> PathBuf {
        PathBuf::from(&self.origin)
    }

    pub fn backup_path(&self) -> PathBuf {
        PathBuf::from(&self.backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf/keepsake.toml");

        let config = MirrorConfig {
            origin: "/data/docs".into(),
            backup: "/mnt/backup/docs".into(),
        };
        config.save(&path).unwrap();

        let loaded = MirrorConfig::load(&path).unwrap();
        assert_eq!(loaded.origin, "/data/docs");
        assert_eq!(loaded.backup, "/mnt/backup/docs");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let empty = MirrorConfig::default();
        assert!(matches!(empty.validate(), Err(MirrorError::Config(_))));

        let half = MirrorConfig {
            origin: "/data".into(),
            backup: String::new(),
        };
        assert!(half.validate().is_err());

        let full = MirrorConfig {
            origin: "/data".into(),
            backup: "/backup".into(),
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.toml");
        fs::write(&path, "origin = \"/data\"\n").unwrap();

        let loaded = MirrorConfig::load(&path).unwrap();
        assert_eq!(loaded.origin, "/data");
        assert!(loaded.backup.is_empty());
        assert!(loaded.validate().is_err());
    }
}
