use async_trait::async_trait;
use serde::Deserialize;

use crate::config::DEFAULT_THUMBNAIL_BASE_URL;
use crate::fetch::{FetchError, HttpClient, fetch_json};

/// The subset of a page summary the resolver reads. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageSummary {
    pub title: Option<String>,
    pub extract: Option<String>,
    pub thumbnail: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub source: Option<String>,
}

/// An outbound lookup of illustrative content for a title.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<PageSummary, FetchError>;
}

/// Looks titles up against a REST page-summary endpoint
/// (`{base_url}/{percent-encoded title}`).
pub struct WikipediaSource<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> WikipediaSource<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_THUMBNAIL_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, title: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl<C: HttpClient> ThumbnailSource for WikipediaSource<C> {
    #[tracing::instrument(skip(self), fields(url = tracing::field::Empty))]
    async fn lookup(&self, title: &str) -> Result<PageSummary, FetchError> {
        let url = self.url_for(title);
        tracing::Span::current().record("url", url.as_str());
        fetch_json(&self.client, &url).await
    }
}
