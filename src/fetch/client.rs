use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Implemented by real clients and by test fakes.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
