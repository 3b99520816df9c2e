//! store::lock
//!
//! Exclusive on-disk lock for the data file.
//!
//! # Architecture
//!
//! The engine's in-process mutex already serializes every
//! read-modify-write cycle. The lock file adds an OS-level guard so an
//! accidental second process cannot interleave loads and saves with
//! ours. Multi-writer operation remains unsupported; a concurrent
//! holder is reported, not waited out.
//!
//! # Storage
//!
//! - `<data_file>.lock` - lock file with an OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock is held for the duration of a load or save
//! - The lock is automatically released on drop (RAII pattern)
//! - Acquisition is non-blocking (fails fast if locked)

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("data file is locked by another turnstile process")]
    AlreadyLocked,

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// I/O error during lock operations.
    #[error("lock i/o error: {0}")]
    IoError(#[from] std::io::Error),
}

/// An exclusive lock on the data file.
///
/// Released automatically when dropped, so the lock is never leaked
/// even if a save fails partway.
#[derive(Debug)]
pub struct StoreLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The open file handle with the lock held. Some while held.
    file: Option<File>,
}

impl StoreLock {
    /// Attempt to acquire the lock for a data file.
    ///
    /// The lock file is a sibling of the data file with a `.lock`
    /// suffix. Acquisition is non-blocking; a held lock returns
    /// [`LockError::AlreadyLocked`] immediately.
    pub fn acquire(data_file: &Path) -> Result<Self, LockError> {
        if let Some(parent) = data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let path = lock_path(data_file);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly. Also happens on drop.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::AcquireFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Best-effort release on drop.
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

/// The lock file path for a data file.
pub fn lock_path(data_file: &Path) -> PathBuf {
    let mut os = data_file.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}
