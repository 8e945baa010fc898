//! JSON-file backed key-value store.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::observability::metrics;

/// Store key for the chain the user last chose to view balances on.
pub const SELECTED_VIEWING_CHAIN: &str = "selected_viewing_chain";

/// A thread-safe persisted key-value store.
///
/// Values are stored as JSON so callers can keep their own types.
/// Every `set` rewrites the backing file; the store holds a handful of
/// UI-state entries, not bulk data.
#[derive(Clone, Default)]
pub struct KvStore {
    inner: Arc<DashMap<String, serde_json::Value>>,
    persistence_path: Option<PathBuf>,
}

impl KvStore {
    /// Create a new empty store. Without a path it is memory-only,
    /// which tests use.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists; a missing file is an empty store.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let map: HashMap<String, serde_json::Value> = serde_json::from_reader(reader)?;

            for (k, v) in map {
                store.inner.insert(k, v);
            }
            metrics::record_store_size(store.inner.len());
            tracing::info!(entries = store.inner.len(), "Loaded key-value store");
        }
        Ok(store)
    }

    fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);

            let map: HashMap<_, _> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();

            serde_json::to_writer(writer, &map)?;
            tracing::debug!(entries = map.len(), "Saved key-value store");
        }
        Ok(())
    }

    /// Set a value and persist. The in-memory entry is updated even if
    /// the write fails, so callers can treat persistence as best
    /// effort.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        let json = serde_json::to_value(value).map_err(std::io::Error::other)?;
        self.inner.insert(key.to_string(), json);
        metrics::record_store_size(self.inner.len());
        self.save_to_file()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.inner.get(key)?;
        serde_json::from_value(entry.value().clone()).ok()
    }

    pub fn remove(&self, key: &str) -> std::io::Result<()> {
        self.inner.remove(key);
        metrics::record_store_size(self.inner.len());
        self.save_to_file()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
