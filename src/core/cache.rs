//! Process-wide cache for the loaded fund table.
//!
//! The spreadsheet read is the only I/O in the pipeline, so it is performed
//! once per source file and reused across interactions. Entries are keyed by
//! path and validated against the file's modification time; a changed file is
//! reloaded transparently. Callers receive a shared, read-only `Arc` of the
//! fund table.

use crate::core::error::DataLoadError;
use crate::core::loader;
use crate::core::model::FundRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::debug;

struct CachedDataset {
    modified: SystemTime,
    funds: Arc<Vec<FundRecord>>,
}

#[derive(Default)]
pub struct DatasetCache {
    inner: Mutex<HashMap<PathBuf, CachedDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the fund table for `path`, loading it on first access or when
    /// the file has changed since it was cached.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Vec<FundRecord>>, DataLoadError> {
        let path = path.as_ref();
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut cache = self.inner.lock().expect("dataset cache poisoned");
        if let Some(entry) = cache.get(path)
            && entry.modified == modified
        {
            debug!("Dataset cache HIT for {}", path.display());
            return Ok(Arc::clone(&entry.funds));
        }

        debug!("Dataset cache MISS for {}", path.display());
        let funds = Arc::new(loader::load_funds(path)?);
        cache.insert(
            path.to_path_buf(),
            CachedDataset {
                modified,
                funds: Arc::clone(&funds),
            },
        );
        Ok(funds)
    }

    /// Evicts a cached dataset, forcing the next `load` to re-read the file.
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) {
        let mut cache = self.inner.lock().expect("dataset cache poisoned");
        if cache.remove(path.as_ref()).is_some() {
            debug!("Dataset cache invalidated for {}", path.as_ref().display());
        }
    }
}
