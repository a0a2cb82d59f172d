//! HTTP plumbing shared by outbound lookups.

mod basic;
mod client;
mod error;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use error::FetchError;

use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;

/// GETs `url` and decodes the body as JSON.
///
/// Non-success statuses are reported as [`FetchError::Status`] without
/// reading the body.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T, FetchError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let url: reqwest::Url = url.parse().map_err(|_| FetchError::Url(url.to_string()))?;

    let mut req = reqwest::Request::new(reqwest::Method::GET, url);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::HttpClient;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies to every request with a fixed status and body and records the URLs.
    pub struct CannedClient {
        status: u16,
        body: String,
        pub calls: AtomicUsize,
        pub urls: Mutex<Vec<String>>,
    }

    impl CannedClient {
        pub fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(req.url().to_string());
            let resp = http::Response::builder()
                .status(self.status)
                .header("content-type", "application/json")
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }
}
