//! Dataset cache keyed by source identity.
//!
//! A source is re-read only when its canonical path, size or modification
//! time changes. A new dataset is published only after it has been loaded in
//! full, so readers see either the previous entry or the new one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

/// What a cached dataset was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceIdentity {
    /// Stat the source. Fails the same way a load would if the file is missing.
    pub fn of(path: &Path) -> Result<Self, LoadError> {
        let io_err = |source: std::io::Error| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = fs::canonicalize(path).map_err(io_err)?;
        let meta = fs::metadata(&canonical).map_err(io_err)?;
        Ok(SourceIdentity {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug)]
struct CacheEntry {
    identity: SourceIdentity,
    loaded_at: SystemTime,
    dataset: Arc<Dataset>,
}

/// Holds at most one loaded dataset.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: RwLock<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it if the source changed.
    ///
    /// On failure the previous entry, if any, stays in place.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let identity = SourceIdentity::of(path)?;

        if let Ok(guard) = self.entry.read() {
            if let Some(entry) = guard.as_ref().filter(|e| e.identity == identity) {
                log::debug!("Dataset cache hit for {}", identity.path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        log::debug!("Dataset cache miss for {}", identity.path.display());
        let dataset = Arc::new(load_file(&identity.path)?);

        let mut guard = self.entry.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(CacheEntry {
            identity,
            loaded_at: SystemTime::now(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// When the current entry was published, if there is one.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.entry
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|e| e.loaded_at))
    }

    /// Identity of the current entry, if there is one.
    pub fn identity(&self) -> Option<SourceIdentity> {
        self.entry
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|e| e.identity.clone()))
    }

    /// Drop the current entry so the next access reloads.
    pub fn invalidate(&self) {
        let mut guard = self.entry.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }
}
