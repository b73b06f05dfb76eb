//! Read-through cache for store queries, keyed by endpoint path.
//!
//! Entries live until they are explicitly invalidated.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        QueryCache {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// Errors from `load` are returned and nothing is cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, load: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "Query cache hit");
            return Ok(hit);
        }

        tracing::debug!(key, "Query cache miss");
        let value = Arc::new(load()?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot while we were loading
        let stored = entries.entry(key.to_string()).or_insert(value);
        Ok(Arc::clone(stored))
    }

    /// Drop one entry. Returns whether anything was cached under `key`.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
