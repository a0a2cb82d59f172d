use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

use super::source::{PageSummary, ThumbnailSource};
use super::store::{MemoStore, MemoryStore};

/// Resolved illustration for a title. `thumb` is `None` when nothing was
/// found or the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub thumb: Option<String>,
    pub title: String,
    pub extract: String,
}

impl Thumbnail {
    pub fn empty(title: &str) -> Self {
        Thumbnail {
            thumb: None,
            title: title.to_string(),
            extract: String::new(),
        }
    }

    fn from_summary(title: &str, summary: PageSummary) -> Self {
        Thumbnail {
            thumb: summary.thumbnail.and_then(|t| t.source).filter(|s| !s.is_empty()),
            title: summary
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| title.to_string()),
            extract: summary.extract.unwrap_or_default(),
        }
    }
}

/// Memo key for a title: case-folded, otherwise untouched.
pub fn memo_key(title: &str) -> String {
    title.to_lowercase()
}

/// Memoizing, never-failing thumbnail lookup.
///
/// The store is checked before and written after the lookup with nothing in
/// between, so two concurrent misses for the same title both hit the source
/// and the later write wins.
pub struct ThumbnailResolver<S, M = MemoryStore> {
    source: S,
    store: Arc<M>,
}

impl<S: ThumbnailSource> ThumbnailResolver<S, MemoryStore> {
    /// Resolver with its own fresh in-memory store.
    pub fn new(source: S) -> Self {
        Self::with_store(source, Arc::new(MemoryStore::new()))
    }
}

impl<S: ThumbnailSource, M: MemoStore> ThumbnailResolver<S, M> {
    pub fn with_store(source: S, store: Arc<M>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<M> {
        &self.store
    }

    /// Returns the cached result for `title`, or looks it up once and caches
    /// whatever comes back. Lookup errors resolve to [`Thumbnail::empty`].
    pub async fn resolve(&self, title: &str) -> Thumbnail {
        let key = memo_key(title);
        if let Some(hit) = self.store.get(&key) {
            trace!(title, "Thumbnail cache hit");
            return hit;
        }

        let resolved = match self.source.lookup(title).await {
            Ok(summary) => Thumbnail::from_summary(title, summary),
            Err(e) => {
                debug!(title, error = %e, "Thumbnail lookup failed, caching empty result");
                Thumbnail::empty(title)
            }
        };

        self.store.put(key, resolved.clone());
        resolved
    }
}
