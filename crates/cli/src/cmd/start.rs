//! Start the mirror

use crate::config_store;
use crate::locks;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub async fn run(config_override: Option<PathBuf>, foreground: bool) -> Result<()> {
    if foreground {
        crate::daemon::run(config_override).await
    } else {
        start_background(config_override).await
    }
}

/// Detach: re-exec ourselves in the foreground under nohup, logging to the
/// backup root's runtime directory
async fn start_background(config_override: Option<PathBuf>) -> Result<()> {
    use std::process::Command;

    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;
    config.validate()?;

    let runtime_dir = config_store::runtime_dir(&config);
    if locks::is_running(&runtime_dir) {
        anyhow::bail!("A mirror for this backup root is already running");
    }

    let log_file = runtime_dir.join("logs/mirror.log");
    std::fs::create_dir_all(runtime_dir.join("logs"))
        .context("Failed to create logs directory")?;

    let exe = std::env::current_exe()
        .context("Failed to get current executable path")?;

    let log_file_writer = std::fs::File::create(&log_file)
        .context("Failed to create log file")?;

    // Pass the resolved config path explicitly so the child agrees on it
    let mut command = Command::new("nohup");
    command
        .arg(&exe)
        .arg("start")
        .arg("--foreground")
        .arg("--config")
        .arg(&config_path);
    command
        .stdout(log_file_writer.try_clone()?)
        .stderr(log_file_writer)
        .spawn()
        .context("Failed to spawn mirror process")?;

    // Give the child a moment, then verify it took the lock
    tokio::time::sleep(Duration::from_millis(500)).await;

    if locks::is_running(&runtime_dir) {
        println!("Mirror started");
        println!("Watching: {}", config.origin);
        println!("Backup:   {}", config.backup);
        println!("Logs:     {}", log_file.display());
        Ok(())
    } else {
        anyhow::bail!(
            "Mirror failed to start (check logs at {})",
            log_file.display()
        )
    }
}
