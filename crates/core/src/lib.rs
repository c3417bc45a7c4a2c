//! Core synchronization primitives for Keepsake
//!
//! Keepsake mirrors an origin directory tree into a backup tree, archiving
//! any destination file that would be overwritten by renaming it with a
//! timestamp suffix first. This crate holds the pure, runtime-free pieces:
//! - Path mapping between the two tree roots
//! - Version archiving of conflicting destination files
//! - The single-file copy operation
//! - The one-time gap-fill walk over the origin tree
//! - Configuration and status-event types

pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod events;
pub mod pathmap;
pub mod walk;

pub use archive::archive_if_exists;
pub use config::MirrorConfig;
pub use copy::{sync_copy, SyncOutcome};
pub use error::MirrorError;
pub use events::{StatusEvent, StatusSink};
pub use pathmap::{destination_for, display_path};
pub use walk::{initial_sync, InitialSyncReport};
