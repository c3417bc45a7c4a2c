//! Foreground engine lifecycle
//!
//! Acquires the mirror lock, runs the service, prints status events, and
//! blocks until an interrupt or stop request arrives. Teardown waits for
//! in-flight copies before the lock is released.

use crate::config_store;
use crate::locks::MirrorLock;
use crate::printer;
use anyhow::{Context, Result};
use keepsake_watcher::MirrorService;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

/// Run the mirror in the foreground until interrupted
pub async fn run(config_override: Option<PathBuf>) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;
    config.validate()?;

    let runtime_dir = config_store::runtime_dir(&config);
    std::fs::create_dir_all(&runtime_dir)
        .context("Failed to create runtime directory")?;
    let lock = MirrorLock::acquire(&runtime_dir)?;

    let (sink, status_rx) = crossbeam_channel::unbounded();
    let printer = std::thread::spawn(move || printer::print_loop(status_rx));

    let service = MirrorService::start(&config, sink).await?;

    println!("{} {}", "Watching:".bold(), config.origin);
    println!("{} {}", "Backup:".bold(), config.backup);
    println!(
        "Initial sync: {} copied, {} already present, {} failed",
        service.initial_report.copied,
        service.initial_report.skipped,
        service.initial_report.failed
    );
    println!("Press Ctrl+C to stop.\n");

    wait_for_shutdown().await?;

    println!("\nStopping (waiting for in-flight copies)...");
    service.stop().await?;

    // The service held the last sink clone; the printer drains and exits
    if printer.join().is_err() {
        tracing::warn!("printer thread panicked");
    }

    lock.release()?;
    println!("Mirror stopped.");
    Ok(())
}

/// Block until Ctrl+C or a termination request
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())
        .context("Failed to install SIGTERM handler")?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        _ = sigterm.recv() => info!("termination requested"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("interrupt received");
    Ok(())
}
