//! Config file location and persistence
//!
//! The engine itself only consumes a validated [`MirrorConfig`]; where the
//! file lives and how it loads is the CLI's business.

use anyhow::{Context, Result};
use keepsake_core::MirrorConfig;
use std::path::{Path, PathBuf};

/// Default config file location: `~/.config/keepsake/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(base.join("keepsake/config.toml"))
}

/// Resolve an optional `--config` override to a concrete path
pub fn resolve(override_path: Option<PathBuf>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

/// Load the config, treating a missing file as empty defaults
///
/// Commands that need a usable config call `validate()` themselves and
/// report the configuration error; `ks config set` works before any file
/// exists.
pub fn load(path: &Path) -> Result<MirrorConfig> {
    if !path.exists() {
        return Ok(MirrorConfig::default());
    }
    MirrorConfig::load(path).with_context(|| format!("could not load {}", path.display()))
}

/// Persist the config
pub fn save(config: &MirrorConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("could not write {}", path.display()))
}

/// Directory for keepsake runtime state (lock, logs) under the backup root
///
/// Lives under the backup tree, not the origin, so the watcher never sees
/// its own bookkeeping.
pub fn runtime_dir(config: &MirrorConfig) -> PathBuf {
    config.backup_path().join(".keepsake")
}
