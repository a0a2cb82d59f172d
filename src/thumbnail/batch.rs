use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::resolver::ThumbnailResolver;
use super::source::ThumbnailSource;
use super::store::MemoStore;

/// Caller-owned flag marking whether a render context is still current.
///
/// Clones share the flag. Once [`Liveness::cancel`] is called, in-progress
/// batches stop and return nothing.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn cancel(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves `(key, title)` pairs one after another and returns the found
/// image URLs by key.
///
/// Returns `None` if `alive` was cancelled before or during the batch, so a
/// stale batch never overwrites a newer one. Titles without an image are
/// left out of the map.
pub async fn resolve_thumbs<S, M>(
    resolver: &ThumbnailResolver<S, M>,
    wanted: &[(String, String)],
    alive: &Liveness,
) -> Option<HashMap<String, String>>
where
    S: ThumbnailSource,
    M: MemoStore,
{
    let mut found = HashMap::new();

    for (key, title) in wanted {
        if !alive.is_alive() {
            return None;
        }
        let thumb = resolver.resolve(title).await;
        if !alive.is_alive() {
            return None;
        }
        if let Some(src) = thumb.thumb {
            found.insert(key.clone(), src);
        }
    }

    Some(found)
}
