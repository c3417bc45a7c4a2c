//! Status events emitted by the engine
//!
//! The engine reports what it did over a channel; formatting policy (colors,
//! layout) belongs to the consumer. Paths are pre-normalized to forward
//! slashes and timestamps are local wall-clock time.

use crate::pathmap::display_path;
use chrono::{DateTime, Local};
use std::path::Path;

/// Sender half of the status-event channel
pub type StatusSink = crossbeam_channel::Sender<StatusEvent>;

/// A human-readable status event from the engine
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// A file was copied into the backup tree
    Synchronized {
        /// Normalized destination path
        path: String,
        at: DateTime<Local>,
    },
    /// A prior destination version was renamed aside before an overwrite
    Archived {
        /// Normalized path of the archived (renamed) file
        path: String,
        at: DateTime<Local>,
    },
    /// A per-file failure; the engine keeps running
    Error {
        /// Normalized path of the file whose update was lost
        path: String,
        message: String,
    },
}

impl StatusEvent {
    pub fn synchronized(path: &Path) -> Self {
        Self::Synchronized {
            path: display_path(path),
            at: Local::now(),
        }
    }

    pub fn archived(path: &Path) -> Self {
        Self::Archived {
            path: display_path(path),
            at: Local::now(),
        }
    }

    pub fn error(path: &Path, message: impl Into<String>) -> Self {
        Self::Error {
            path: display_path(path),
            message: message.into(),
        }
    }
}

/// Send an event, ignoring a disconnected receiver
///
/// The engine never fails because nobody is listening.
pub fn emit(sink: &StatusSink, event: StatusEvent) {
    let _ = sink.send(event);
}
