//! Stop a running mirror

use crate::config_store;
use crate::locks;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// How long to wait for the mirror to finish in-flight copies and exit
const STOP_TIMEOUT: Duration = Duration::from_secs(15);

pub async fn run(config_override: Option<PathBuf>) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;
    config.validate()?;

    let runtime_dir = config_store::runtime_dir(&config);

    let pid = match locks::running_pid(&runtime_dir) {
        Some(pid) => pid,
        None => {
            println!("No mirror is running for this backup root");
            return Ok(());
        }
    };

    send_stop_signal(pid).context("Failed to signal the mirror process")?;

    // The mirror drains in-flight copies before releasing its lock
    let deadline = tokio::time::Instant::now() + STOP_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if !locks::is_running(&runtime_dir) {
            println!("Mirror stopped");
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    anyhow::bail!("Mirror (pid {}) did not stop within {:?}", pid, STOP_TIMEOUT)
}

#[cfg(unix)]
fn send_stop_signal(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGTERM)?;
    Ok(())
}

#[cfg(not(unix))]
fn send_stop_signal(_pid: u32) -> Result<()> {
    anyhow::bail!("stopping a detached mirror is not supported on this platform")
}
