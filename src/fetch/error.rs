use reqwest::StatusCode;

/// Why a JSON fetch did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url '{0}'")]
    Url(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}
