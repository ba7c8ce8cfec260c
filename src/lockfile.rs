//! Single-instance run lock.
//!
//! A filesystem marker prevents two scheduled invocations from reconciling
//! the same board at once. The file holds the owning process id and start
//! time in a simple key=value format:
//! ```text
//! PID=12345
//! STARTED=2026-08-29T06:00:00Z
//! ```
//! A lock whose mtime is older than [`STALE_AFTER`] is considered abandoned
//! (crashed run, powered-off host) and force-cleared. Release is tied to the
//! guard's `Drop`, so it happens on every exit path.

use chrono::Utc;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Age after which an existing lock is treated as abandoned.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Information stored in the lock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockInfo {
    pub pid: u32,
    pub started: String,
}

/// Holds the run lock; deletes the lock file when dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock at `path`.
    ///
    /// Fails with [`Error::LockHeld`] when a fresh lock exists. A stale lock
    /// is cleared with a warning and acquisition proceeds. Creation itself is
    /// the atomic claim: two racing invocations both passing the staleness
    /// check still end with a single winner.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(age) = lock_age(path)? {
            if age < STALE_AFTER {
                if let Ok(Some(info)) = Self::read(path) {
                    debug!(pid = info.pid, started = %info.started, "lock held by another run");
                }
                return Err(Error::LockHeld(path.to_path_buf()));
            }
            warn!(
                path = %path.display(),
                age_secs = age.as_secs(),
                "clearing stale lock file"
            );
            remove_if_exists(path)?;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = format!(
            "PID={}\nSTARTED={}\n",
            std::process::id(),
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        );
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::LockHeld(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read and parse a lock file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> io::Result<Option<LockInfo>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(parse_contents(&contents)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = remove_if_exists(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock file");
        }
    }
}

/// Age of the lock file at `path`, or `None` when absent.
fn lock_age(path: &Path) -> Result<Option<Duration>> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let modified = metadata.modified()?;
    // A lock from the future (clock step) counts as fresh
    Ok(Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    ))
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn parse_contents(contents: &str) -> io::Result<LockInfo> {
    let mut pid: Option<u32> = None;
    let mut started: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key {
                "PID" => {
                    pid = Some(value.parse().map_err(|_| {
                        io::Error::new(io::ErrorKind::InvalidData, "Invalid PID value")
                    })?);
                }
                "STARTED" => started = Some(value.to_string()),
                _ => {} // Ignore unknown keys for forward compatibility
            }
        }
    }

    let pid = pid.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Missing PID field"))?;
    let started = started
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Missing STARTED field"))?;

    Ok(LockInfo { pid, started })
}
