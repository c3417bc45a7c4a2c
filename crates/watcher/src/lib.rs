//! Live mirroring engine for Keepsake
//!
//! Wraps the OS change-notification mechanism (`notify`) behind an explicit
//! service object:
//! - One-time gap-fill sync before the watcher is armed
//! - Per-path debouncing (fixed 500ms window)
//! - Version-preserving copies dispatched off the event loop
//! - Graceful stop that drains in-flight copies

pub mod debounce;
pub mod router;

use anyhow::{Context, Result};
use keepsake_core::events::StatusSink;
use keepsake_core::{initial_sync, InitialSyncReport, MirrorConfig};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use debounce::DebounceState;
use router::EventRouter;

/// A change notification, already reduced to what the router cares about
#[derive(Debug, Clone)]
pub struct FileEvent {
    /// Absolute path under the origin root
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
    /// Whether the path named a directory at event time
    pub is_dir: bool,
}

/// Type of file system event the engine processes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    Modified,
}

/// The running mirror engine
///
/// Owns its watcher and router lifecycle; there is no global monitoring
/// state. [`MirrorService::start`] arms everything, [`MirrorService::stop`]
/// tears it down without abandoning a copy mid-flight.
pub struct MirrorService {
    origin_root: PathBuf,
    watcher: RecommendedWatcher,
    router: JoinHandle<()>,
    /// Counters from the gap-fill pass that ran at startup
    pub initial_report: InitialSyncReport,
}

impl MirrorService {
    /// Validate config, run the initial sync, then arm the watcher
    ///
    /// The initial sync completes (or fails) before the first change
    /// notification can be delivered, so the walker's gap-fill and the
    /// router's incremental copies never race on the same new file.
    pub async fn start(config: &MirrorConfig, sink: StatusSink) -> Result<Self> {
        config.validate()?;

        let origin_root = config.origin_path();
        let backup_root = config.backup_path();

        if !origin_root.is_dir() {
            anyhow::bail!(
                "origin root {} does not exist or is not a directory",
                origin_root.display()
            );
        }
        fs::create_dir_all(&backup_root)
            .with_context(|| format!("could not create backup root {}", backup_root.display()))?;

        let initial_report = {
            let origin = origin_root.clone();
            let backup = backup_root.clone();
            let sink = sink.clone();
            tokio::task::spawn_blocking(move || initial_sync(&origin, &backup, &sink))
                .await
                .context("initial sync task panicked")??
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => bridge_event(event, &events_tx),
                // Watcher-level faults are logged and dropped; the
                // subscription itself stays up
                Err(e) => warn!(error = %e, "watcher error"),
            }
        })
        .context("could not create filesystem watcher")?;

        watcher
            .watch(&origin_root, RecursiveMode::Recursive)
            .with_context(|| format!("could not watch {}", origin_root.display()))?;

        info!(origin = %origin_root.display(), backup = %backup_root.display(), "mirror armed");

        let router = EventRouter::new(
            origin_root.clone(),
            backup_root,
            Arc::new(DebounceState::new()),
            sink,
        );
        let router = tokio::spawn(router.run(events_rx));

        Ok(Self {
            origin_root,
            watcher,
            router,
            initial_report,
        })
    }

    /// Stop accepting events and wait for in-flight copies to finish
    pub async fn stop(mut self) -> Result<()> {
        // Unwatch may fail if the root vanished; the drop below still
        // closes the event channel
        if let Err(e) = self.watcher.unwatch(&self.origin_root) {
            warn!(error = %e, "unwatch failed");
        }
        drop(self.watcher);

        self.router.await.context("event router panicked")?;
        info!("mirror stopped");
        Ok(())
    }
}

/// Translate a notify event into router events, one per affected path
///
/// Only create and modify notifications cross the bridge; everything else
/// (removal, access, rename bookkeeping) is dropped here.
fn bridge_event(event: notify::Event, tx: &mpsc::UnboundedSender<FileEvent>) {
    let kind = match event.kind {
        notify::EventKind::Create(_) => EventKind::Created,
        notify::EventKind::Modify(_) => EventKind::Modified,
        _ => return,
    };

    for path in event.paths {
        let is_dir = path.is_dir();
        // Send fails only when the router is gone, i.e. during teardown
        let _ = tx.send(FileEvent { path, kind, is_dir });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_rejects_empty_config() {
        let (sink, _rx) = crossbeam_channel::unbounded();
        let config = MirrorConfig::default();

        let result = MirrorService::start(&config, sink).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_start_rejects_missing_origin() {
        let (sink, _rx) = crossbeam_channel::unbounded();
        let backup = tempfile::TempDir::new().unwrap();
        let config = MirrorConfig {
            origin: "/definitely/not/a/real/path".into(),
            backup: backup.path().to_string_lossy().into_owned(),
        };

        let result = MirrorService::start(&config, sink).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_bridge_drops_remove_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        bridge_event(
            notify::Event::new(notify::EventKind::Remove(notify::event::RemoveKind::File))
                .add_path("/o/a.txt".into()),
            &tx,
        );
        bridge_event(
            notify::Event::new(notify::EventKind::Create(notify::event::CreateKind::File))
                .add_path("/o/b.txt".into()),
            &tx,
        );

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::Created);
        assert_eq!(event.path, PathBuf::from("/o/b.txt"));
        assert!(rx.try_recv().is_err());
    }
}
