//! Debounced event routing
//!
//! Consumes the watcher's event stream, drops directory events and
//! in-window duplicates, and dispatches each surviving event onto its own
//! blocking task so a slow copy of one path never stalls the others.

use crate::debounce::DebounceState;
use crate::FileEvent;
use keepsake_core::events::{emit, StatusEvent, StatusSink};
use keepsake_core::sync_copy;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

/// How often stale debounce entries are evicted
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Entries older than this can no longer affect an accept decision
const PRUNE_AGE: Duration = Duration::from_secs(60);

/// Routes watcher events into version-preserving copies
pub struct EventRouter {
    origin_root: PathBuf,
    backup_root: PathBuf,
    debounce: Arc<DebounceState>,
    sink: StatusSink,
}

impl EventRouter {
    pub fn new(
        origin_root: PathBuf,
        backup_root: PathBuf,
        debounce: Arc<DebounceState>,
        sink: StatusSink,
    ) -> Self {
        Self {
            origin_root,
            backup_root,
            debounce,
            sink,
        }
    }

    /// Consume events until the channel closes, then drain in-flight copies
    ///
    /// A copy in progress runs to completion or filesystem error, never to
    /// forced abort; teardown waits for every dispatched copy.
    pub async fn run(self, mut events: UnboundedReceiver<FileEvent>) {
        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut prune_timer = tokio::time::interval(PRUNE_INTERVAL);
        prune_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.route(event, &mut in_flight),
                    None => break,
                },
                _ = prune_timer.tick() => {
                    self.debounce.prune_older_than(PRUNE_AGE, Instant::now());
                }
                // Reap finished copies so the set does not grow unbounded
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        warn!(error = %e, "copy task failed");
                    }
                }
            }
        }

        debug!(pending = in_flight.len(), "event stream closed, draining copies");
        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "copy task failed during drain");
            }
        }
    }

    /// Filter one event and, if it survives, dispatch its copy
    fn route(&self, event: FileEvent, in_flight: &mut JoinSet<()>) {
        // Directory events never reach the debounce map
        if event.is_dir {
            return;
        }

        if !self.debounce.accept(&event.path, Instant::now()) {
            trace!(path = %event.path.display(), "debounced");
            return;
        }

        let path = event.path;
        let origin_root = self.origin_root.clone();
        let backup_root = self.backup_root.clone();
        let sink = self.sink.clone();

        in_flight.spawn_blocking(move || {
            match sync_copy(&path, &origin_root, &backup_root) {
                Ok(Some(outcome)) => {
                    if let Some(archived) = &outcome.archived {
                        emit(&sink, StatusEvent::archived(archived));
                    }
                    emit(&sink, StatusEvent::synchronized(&outcome.destination));
                }
                // Not a regular file, or vanished before the copy
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "synchronization failed");
                    emit(&sink, StatusEvent::error(&path, e.to_string()));
                }
            }
        });
    }
}
