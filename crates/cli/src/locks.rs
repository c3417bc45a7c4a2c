//! Lock file management for mirror exclusivity
//!
//! Two engines mirroring into the same backup root would race on archive
//! names; a flock-guarded lock file under `<backup>/.keepsake/locks/`
//! prevents that.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Mirror lock file structure
pub struct MirrorLock {
    path: PathBuf,
    #[allow(dead_code)]
    file: File,
}

/// Lock file content
#[derive(Serialize, Deserialize)]
struct LockContent {
    pid: u32,
    started_at: u64,
}

impl MirrorLock {
    /// Acquire the exclusive mirror lock for a backup root
    ///
    /// Returns an error if another live process already holds it. A lock
    /// left behind by a dead process is removed and the acquisition
    /// retried.
    pub fn acquire(runtime_dir: &Path) -> Result<Self> {
        let lock_path = lock_file_path(runtime_dir);

        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create locks directory")?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&lock_path)
            .context("Failed to open lock file")?;

        if !try_flock_exclusive(&file)? {
            if Self::is_stale_lock(&mut file)? {
                tracing::warn!("Removing stale mirror lock");
                drop(file);
                std::fs::remove_file(&lock_path)?;
                return Self::acquire(runtime_dir); // Retry
            } else {
                anyhow::bail!("A mirror for this backup root is already running");
            }
        }

        Self::write_lock_content(&mut file)?;

        Ok(Self {
            path: lock_path,
            file,
        })
    }

    /// Release the lock and remove its file
    pub fn release(self) -> Result<()> {
        std::fs::remove_file(&self.path)
            .context("Failed to remove lock file")?;
        Ok(())
    }

    /// Check if lock file represents a stale lock
    fn is_stale_lock(file: &mut File) -> Result<bool> {
        match Self::read_lock_content(file) {
            Ok(content) => Ok(!is_process_alive(content.pid)),
            // Unreadable content means a half-written lock; treat as stale
            Err(_) => Ok(true),
        }
    }

    /// Write lock content (PID + timestamp)
    fn write_lock_content(file: &mut File) -> Result<()> {
        let content = LockContent {
            pid: std::process::id(),
            started_at: current_timestamp_ms(),
        };

        let serialized = serde_json::to_string(&content)
            .context("Failed to serialize lock content")?;

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Read lock content from file
    fn read_lock_content(file: &mut File) -> Result<LockContent> {
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let content: LockContent = serde_json::from_str(&contents)
            .context("Failed to deserialize lock content")?;
        Ok(content)
    }
}

impl Drop for MirrorLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Path of the lock file within a runtime directory
fn lock_file_path(runtime_dir: &Path) -> PathBuf {
    runtime_dir.join("locks/mirror.lock")
}

/// Read the PID of the lock holder, if a live one exists
pub fn running_pid(runtime_dir: &Path) -> Option<u32> {
    let lock_path = lock_file_path(runtime_dir);
    let contents = std::fs::read_to_string(lock_path).ok()?;
    let content: LockContent = serde_json::from_str(&contents).ok()?;

    if is_process_alive(content.pid) {
        Some(content.pid)
    } else {
        None
    }
}

/// Check whether a mirror holds the lock for this runtime directory
pub fn is_running(runtime_dir: &Path) -> bool {
    running_pid(runtime_dir).is_some()
}

/// Try to acquire exclusive file lock (non-blocking)
#[cfg(unix)]
fn try_flock_exclusive(file: &File) -> Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(unix))]
fn try_flock_exclusive(_file: &File) -> Result<bool> {
    // No advisory locking; fall back to PID-based staleness only
    Ok(true)
}

/// Check if process is alive
#[cfg(target_os = "macos")]
fn is_process_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // Null signal checks existence without delivering anything
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(_) => true,
        Err(nix::errno::Errno::ESRCH) => false, // No such process
        Err(_) => true,                         // Permission denied or other - assume alive
    }
}

#[cfg(target_os = "linux")]
fn is_process_alive(pid: u32) -> bool {
    // Check /proc/<pid> directory exists
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn is_process_alive(_pid: u32) -> bool {
    // Conservative: assume process is alive on unknown platforms
    true
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("System time before UNIX epoch")
        .as_millis() as u64
}
