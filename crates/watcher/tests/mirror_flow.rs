//! End-to-end mirror flow against a real filesystem watcher

use keepsake_core::{MirrorConfig, StatusEvent};
use keepsake_watcher::MirrorService;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn config_for(origin: &TempDir, backup: &TempDir) -> MirrorConfig {
    MirrorConfig {
        origin: origin.path().to_string_lossy().into_owned(),
        backup: backup.path().to_string_lossy().into_owned(),
    }
}

/// Poll until the predicate holds or the timeout elapses
async fn wait_for(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    predicate()
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_initial_sync_runs_before_watching() {
    let origin = TempDir::new().unwrap();
    let backup = TempDir::new().unwrap();

    fs::create_dir_all(origin.path().join("docs")).unwrap();
    fs::write(origin.path().join("docs/a.txt"), b"alpha").unwrap();
    // Pre-existing backup content must survive untouched
    fs::write(backup.path().join("keep.txt"), b"mine").unwrap();

    let (sink, _status_rx) = crossbeam_channel::unbounded();
    let service = MirrorService::start(&config_for(&origin, &backup), sink)
        .await
        .unwrap();

    assert_eq!(service.initial_report.copied, 1);
    assert_eq!(
        fs::read(backup.path().join("docs/a.txt")).unwrap(),
        b"alpha"
    );
    assert_eq!(fs::read(backup.path().join("keep.txt")).unwrap(), b"mine");

    service.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_file_is_mirrored() {
    let origin = TempDir::new().unwrap();
    let backup = TempDir::new().unwrap();

    let (sink, status_rx) = crossbeam_channel::unbounded();
    let service = MirrorService::start(&config_for(&origin, &backup), sink)
        .await
        .unwrap();

    fs::write(origin.path().join("fresh.txt"), b"hello").unwrap();

    let mirrored = backup.path().join("fresh.txt");
    assert!(
        wait_for(Duration::from_secs(5), || mirrored.is_file()).await,
        "new file was not mirrored within the timeout"
    );
    assert_eq!(fs::read(&mirrored).unwrap(), b"hello");

    service.stop().await.unwrap();

    assert!(status_rx
        .try_iter()
        .any(|e| matches!(e, StatusEvent::Synchronized { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_overwrite_archives_prior_version() {
    let origin = TempDir::new().unwrap();
    let backup = TempDir::new().unwrap();

    fs::write(origin.path().join("doc.txt"), b"v1").unwrap();

    let (sink, status_rx) = crossbeam_channel::unbounded();
    let service = MirrorService::start(&config_for(&origin, &backup), sink)
        .await
        .unwrap();

    // v1 landed via initial sync; let the debounce window pass, then modify
    tokio::time::sleep(Duration::from_millis(600)).await;
    fs::write(origin.path().join("doc.txt"), b"v2").unwrap();

    let backup_root = backup.path().to_path_buf();
    assert!(
        wait_for(Duration::from_secs(5), || {
            fs::read(backup_root.join("doc.txt"))
                .map(|c| c == b"v2")
                .unwrap_or(false)
                && file_count(&backup_root) == 2
        })
        .await,
        "expected the new content plus one archived sibling"
    );

    // The archive embeds a timestamp and keeps the extension
    let archived_name = fs::read_dir(&backup_root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .find(|n| n != "doc.txt")
        .unwrap();
    assert!(archived_name.starts_with("doc_"));
    assert!(archived_name.ends_with(".txt"));

    service.stop().await.unwrap();

    let events: Vec<_> = status_rx.try_iter().collect();
    assert!(events
        .iter()
        .any(|e| matches!(e, StatusEvent::Archived { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_then_modify_is_ignored() {
    let origin = TempDir::new().unwrap();
    let backup = TempDir::new().unwrap();

    let (sink, _status_rx) = crossbeam_channel::unbounded();
    let service = MirrorService::start(&config_for(&origin, &backup), sink)
        .await
        .unwrap();
    service.stop().await.unwrap();

    fs::write(origin.path().join("late.txt"), b"too late").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(!backup.path().join("late.txt").exists());
}
