//! Per-path debouncing
//!
//! Editors commonly perform several writes per logical save; the watcher
//! delivers one notification per write. Debouncing collapses those bursts
//! into a single synchronization per path per window.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Fixed engine parameter: events for a path arriving within this window
/// of the last processed event are dropped
pub const DEBOUNCE_THRESHOLD: Duration = Duration::from_millis(500);

/// Last-processed-time bookkeeping, one entry per path
///
/// The map records the time of the last *processed* event, not the last
/// observed one: a dropped event does not extend the window. Entries are
/// never removed on the hot path, so the map grows with the number of
/// distinct paths touched; [`DebounceState::prune_older_than`] offers
/// bounded eviction for long-running processes.
///
/// The check-then-set is a single critical section under one coarse mutex;
/// the event rate is low enough that per-path locks would buy nothing.
pub struct DebounceState {
    last_processed: Mutex<HashMap<PathBuf, Instant>>,
    threshold: Duration,
}

impl DebounceState {
    pub fn new() -> Self {
        Self::with_threshold(DEBOUNCE_THRESHOLD)
    }

    /// Custom threshold, used by tests
    pub fn with_threshold(threshold: Duration) -> Self {
        Self {
            last_processed: Mutex::new(HashMap::new()),
            threshold,
        }
    }

    /// Atomically decide whether an event at `now` should be processed
    ///
    /// Returns true and records `now` when the path was never processed or
    /// its last processed event is older than the threshold. Returns false
    /// (recording nothing) otherwise.
    pub fn accept(&self, path: &Path, now: Instant) -> bool {
        let mut map = self.last_processed.lock();

        if let Some(last) = map.get(path) {
            if now.duration_since(*last) <= self.threshold {
                return false;
            }
        }

        map.insert(path.to_path_buf(), now);
        true
    }

    /// Drop entries whose last processed event is older than `age`
    ///
    /// Entries that old can no longer influence an accept decision, so
    /// eviction does not change observable behavior.
    pub fn prune_older_than(&self, age: Duration, now: Instant) {
        debug_assert!(age > self.threshold);
        self.last_processed
            .lock()
            .retain(|_, last| now.duration_since(*last) <= age);
    }

    /// Number of tracked paths
    pub fn len(&self) -> usize {
        self.last_processed.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_processed.lock().is_empty()
    }
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_accepted() {
        let state = DebounceState::new();
        assert!(state.accept(Path::new("/o/a.txt"), Instant::now()));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_event_inside_window_is_dropped() {
        let state = DebounceState::new();
        let t0 = Instant::now();

        assert!(state.accept(Path::new("/o/a.txt"), t0));
        assert!(!state.accept(Path::new("/o/a.txt"), t0 + Duration::from_millis(100)));
        // The drop did not refresh the window
        assert!(state.accept(Path::new("/o/a.txt"), t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_window_reopens_after_threshold() {
        let state = DebounceState::new();
        let t0 = Instant::now();

        assert!(state.accept(Path::new("/o/a.txt"), t0));
        assert!(state.accept(Path::new("/o/a.txt"), t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        // Exactly at the threshold is still inside the window (T - last
        // must be strictly greater)
        let state = DebounceState::new();
        let t0 = Instant::now();

        assert!(state.accept(Path::new("/o/a.txt"), t0));
        assert!(!state.accept(Path::new("/o/a.txt"), t0 + DEBOUNCE_THRESHOLD));
    }

    #[test]
    fn test_paths_are_independent() {
        let state = DebounceState::new();
        let t0 = Instant::now();

        assert!(state.accept(Path::new("/o/a.txt"), t0));
        assert!(state.accept(Path::new("/o/b.txt"), t0 + Duration::from_millis(1)));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_prune_drops_only_stale_entries() {
        let state = DebounceState::new();
        let t0 = Instant::now();
        let now = t0 + Duration::from_secs(120);

        state.accept(Path::new("/o/stale.txt"), t0);
        state.accept(Path::new("/o/fresh.txt"), now);

        state.prune_older_than(Duration::from_secs(60), now);

        assert_eq!(state.len(), 1);
        // The fresh entry still debounces
        assert!(!state.accept(Path::new("/o/fresh.txt"), now + Duration::from_millis(10)));
    }
}
