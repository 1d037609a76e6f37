/// In-memory keyed cache with graceful degradation.
///
/// All lookups return `Option<V>`. A poisoned lock logs a warning and behaves like a miss, so
/// callers fall through to compute from source. Nothing here is global: owners create a cache
/// and pass it to whatever needs it.
use std::collections::HashMap;
use std::sync::RwLock;

use tracing::warn;

pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self
            .entries
            .read()
            .inspect_err(|_| warn!(key, "cache lock poisoned, treating as miss"))
            .ok()?;
        entries.get(key).cloned()
    }

    /// Returns `true` if the value was stored.
    pub fn set(&self, key: &str, value: V) -> bool {
        let Ok(mut entries) = self
            .entries
            .write()
            .inspect_err(|_| warn!(key, "cache lock poisoned, SET skipped"))
        else {
            return false;
        };
        entries.insert(key.to_string(), value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
