//! One-shot gap-fill sync

use crate::config_store;
use crate::locks::MirrorLock;
use crate::printer;
use anyhow::{Context, Result};
use keepsake_core::initial_sync;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(config_override: Option<PathBuf>) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;
    config.validate()?;

    let origin = config.origin_path();
    let backup = config.backup_path();

    if !origin.is_dir() {
        anyhow::bail!(
            "origin root {} does not exist or is not a directory",
            origin.display()
        );
    }
    std::fs::create_dir_all(&backup)
        .with_context(|| format!("could not create backup root {}", backup.display()))?;

    // A live watcher writes into the same tree; don't interleave with it
    let runtime_dir = config_store::runtime_dir(&config);
    std::fs::create_dir_all(&runtime_dir)?;
    let lock = MirrorLock::acquire(&runtime_dir)?;

    let (sink, status_rx) = crossbeam_channel::unbounded();
    let printer = std::thread::spawn(move || printer::print_loop(status_rx));

    let report = tokio::task::spawn_blocking(move || initial_sync(&origin, &backup, &sink))
        .await
        .context("sync task panicked")??;

    if printer.join().is_err() {
        tracing::warn!("printer thread panicked");
    }
    lock.release()?;

    println!(
        "\n{} {} copied, {} already present, {} failed",
        "Done:".bold(),
        report.copied,
        report.skipped,
        report.failed
    );

    if report.failed > 0 {
        anyhow::bail!("{} file(s) failed to copy", report.failed);
    }
    Ok(())
}
