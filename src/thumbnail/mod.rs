//! Best-effort thumbnail lookup for display titles.
//!
//! [`ThumbnailResolver`] memoizes every lookup, failures included, in an
//! injected [`MemoStore`]; [`ThumbnailSource`] is the outbound call, with
//! [`WikipediaSource`] as the default implementation.
//!
//! [`resolve_thumbs`] is for long-lived callers (a UI, a server handler) that
//! may abandon a batch mid-way; one-shot callers like the CLI resolve titles
//! directly.

mod batch;
mod resolver;
mod source;
mod store;

pub use batch::{Liveness, resolve_thumbs};
pub use resolver::{Thumbnail, ThumbnailResolver, memo_key};
pub use source::{ImageRef, PageSummary, ThumbnailSource, WikipediaSource};
pub use store::{MemoStore, MemoryStore};
