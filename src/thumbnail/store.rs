use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::resolver::Thumbnail;

/// Key/value store backing the resolver's memoization.
///
/// Entries are never evicted by the resolver; implementations may bound
/// themselves if they need to.
pub trait MemoStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Thumbnail>;
    fn put(&self, key: String, value: Thumbnail);
}

/// In-memory store that lives as long as the process (or the test) holds it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Thumbnail>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl MemoStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Thumbnail> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: String, value: Thumbnail) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}
