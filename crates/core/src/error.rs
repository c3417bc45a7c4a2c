//! Error types for the synchronization engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the mirror engine
///
/// Only `Config` is fatal: the engine refuses to start without both roots.
/// `OutsideOrigin` and `Io` are per-event failures; the engine logs them
/// and keeps serving subsequent events.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Missing or invalid configuration; the engine does not start
    #[error("configuration error: {0}")]
    Config(String),

    /// A source path is not contained within the configured origin root
    #[error("path {path} is outside the origin root {origin}")]
    OutsideOrigin { path: PathBuf, origin: PathBuf },

    /// Filesystem failure (permission, disk full, path vanished mid-operation)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
