//! Persistence backends for the store.
//!
//! The store only talks to the `Storage` trait, so the local file backend can
//! be swapped for another repository without touching the mutation API.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::snapshot::{decode, encode, PersistedState};
use crate::config::CoreConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse stored state: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub trait Storage {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<PersistedState>, StorageError>;

    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError>;

    /// Called before the first save that follows a failed `load`, so the
    /// unreadable snapshot is not overwritten. Returns where it was kept, or
    /// `None` when there was nothing to keep.
    fn preserve_unreadable(&mut self, _now: DateTime<Utc>) -> Result<Option<PathBuf>, StorageError> {
        Ok(None)
    }
}

/// Pretty-printed JSON file, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.storage_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        decode(&contents).map(Some)
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        let json = encode(state)?;
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // Write-then-rename so a crash mid-write never leaves a torn file
        let temp_file = self.path.with_extension("json.tmp");
        fs::write(&temp_file, json).map_err(write_err)?;
        fs::rename(&temp_file, &self.path).map_err(write_err)?;
        Ok(())
    }

    /// Rename the file to `<name>.corrupt-<timestamp>` next to it
    fn preserve_unreadable(&mut self, now: DateTime<Utc>) -> Result<Option<PathBuf>, StorageError> {
        let file_name = match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Ok(None),
        };
        let target = self.path.with_file_name(format!(
            "{}.corrupt-{}",
            file_name,
            now.format("%Y%m%dT%H%M%SZ")
        ));
        match fs::rename(&self.path, &target) {
            Ok(()) => Ok(Some(target)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Write {
                path: target,
                source,
            }),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    blob: Option<String>,
    writes: usize,
}

/// In-process backend. Clones share the same buffer, which lets a caller
/// keep a handle to inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed with a raw blob, as if written by an earlier session
    pub fn with_contents(blob: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.inner.lock().blob = Some(blob.into());
        storage
    }

    /// Number of saves performed so far
    pub fn writes(&self) -> usize {
        self.inner.lock().writes
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        match self.inner.lock().blob.as_deref() {
            Some(blob) => decode(blob).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        let json = encode(state)?;
        let mut inner = self.inner.lock();
        inner.blob = Some(json);
        inner.writes += 1;
        Ok(())
    }
}
