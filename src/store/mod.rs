//! store
//!
//! Exclusive-access persistence of the aggregate to a single file.
//!
//! # Architecture
//!
//! [`FileStore`] owns the path of the persisted JSON file and performs
//! all reads and writes. Corruption is self-healing: an unreadable
//! file is renamed to a timestamped backup and replaced with the empty
//! aggregate, and the caller learns about it through a
//! [`StoreNotice`], never an error. Saves go through a temporary
//! sibling file and an atomic rename, so the canonical file is never
//! observed half-written.
//!
//! # Storage
//!
//! - `<file>` - canonical pretty-printed JSON aggregate
//! - `<file>.tmp` - transient save target, removed on failure
//! - `<file>.corrupt.<YYYYMMDD_HHMMSS>.bak` - unreadable originals
//! - `<file>.lock` - OS-level lock file (see [`lock`])
//!
//! Backup and temp files accumulate; pruning is out of scope.
//!
//! # Invariants
//!
//! - A load or save holds the store lock for its whole duration
//! - The canonical file always contains a complete JSON document
//! - Corruption during load never propagates as an error

pub mod lock;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::core::schema::{Aggregate, TOP_LEVEL_FIELDS};

pub use lock::{LockError, StoreLock};

/// Errors from persistence operations.
///
/// Surfaced to callers as "the change may not have been saved"; the
/// previously-committed file is untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read data file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write data file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace data file '{path}': {source}")]
    RenameFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize aggregate: {0}")]
    SerializeFailed(#[from] serde_json::Error),

    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Self-healing events observed during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreNotice {
    /// No file existed; a fresh empty aggregate was written.
    Initialized,

    /// The file was unreadable; the original bytes were preserved at
    /// the backup path and the store reinitialized empty.
    Recovered { backup: PathBuf },

    /// The file was missing top-level fields; defaults were filled and
    /// the upgraded shape persisted.
    Upgraded,
}

impl std::fmt::Display for StoreNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreNotice::Initialized => f.write_str("created new data file"),
            StoreNotice::Recovered { backup } => write!(
                f,
                "data file was unreadable; original preserved at {}",
                backup.display()
            ),
            StoreNotice::Upgraded => f.write_str("data file upgraded to current schema"),
        }
    }
}

/// Result of loading the aggregate.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded (possibly freshly initialized) aggregate.
    pub aggregate: Aggregate,
    /// Self-healing events, for the caller to surface as warnings.
    pub notices: Vec<StoreNotice>,
}

/// File-backed aggregate store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the given data file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the canonical data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the aggregate.
    ///
    /// - Missing file: write and return the empty aggregate.
    /// - Unparseable file: rename to a timestamped `.corrupt` backup,
    ///   reinitialize empty. Reported as a [`StoreNotice::Recovered`],
    ///   not an error.
    /// - Missing top-level fields: fill defaults and persist the
    ///   upgraded shape before returning.
    pub fn load(&self) -> Result<LoadResult, StoreError> {
        let _lock = StoreLock::acquire(&self.path)?;
        self.load_locked()
    }

    /// Save the aggregate atomically.
    pub fn save(&self, aggregate: &Aggregate) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire(&self.path)?;
        self.write_atomic(aggregate)
    }

    fn load_locked(&self) -> Result<LoadResult, StoreError> {
        if !self.path.exists() {
            let aggregate = Aggregate::empty();
            self.write_atomic(&aggregate)?;
            return Ok(LoadResult {
                aggregate,
                notices: vec![StoreNotice::Initialized],
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;

        match parse_aggregate(&content) {
            Ok((aggregate, upgraded)) => {
                let mut notices = Vec::new();
                if upgraded {
                    self.write_atomic(&aggregate)?;
                    notices.push(StoreNotice::Upgraded);
                }
                Ok(LoadResult { aggregate, notices })
            }
            Err(_) => {
                let backup = self.backup_corrupt()?;
                let aggregate = Aggregate::empty();
                self.write_atomic(&aggregate)?;
                Ok(LoadResult {
                    aggregate,
                    notices: vec![StoreNotice::Recovered { backup }],
                })
            }
        }
    }

    /// Rename the unreadable file out of the way, preserving its bytes.
    fn backup_corrupt(&self) -> Result<PathBuf, StoreError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut os = self.path.as_os_str().to_os_string();
        os.push(format!(".corrupt.{timestamp}.bak"));
        let backup = PathBuf::from(os);
        fs::rename(&self.path, &backup).map_err(|source| StoreError::RenameFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(backup)
    }

    /// Write the aggregate to `<file>.tmp`, then rename over the
    /// canonical path. On failure the temp file is removed and the
    /// previously-committed file is untouched.
    fn write_atomic(&self, aggregate: &Aggregate) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(aggregate)?;
        let tmp = self.temp_path();

        if let Err(source) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::WriteFailed {
                path: tmp,
                source,
            });
        }

        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::RenameFailed {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

/// Parse file content into an aggregate, reporting whether top-level
/// fields were missing (schema upgrade).
///
/// Any parse failure means the file is corrupt; the distinction
/// between malformed JSON, a non-object document, and wrongly typed
/// fields does not matter to the caller.
fn parse_aggregate(content: &str) -> Result<(Aggregate, bool), ()> {
    if content.trim().is_empty() {
        return Err(());
    }
    let value: serde_json::Value = serde_json::from_str(content).map_err(|_| ())?;
    let object = value.as_object().ok_or(())?;
    let upgraded = TOP_LEVEL_FIELDS
        .iter()
        .any(|field| !object.contains_key(*field));
    let aggregate: Aggregate = serde_json::from_value(value).map_err(|_| ())?;
    Ok((aggregate, upgraded))
}
