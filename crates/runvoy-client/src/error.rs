use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unauthorized: re-run `runvoy claim <token>` to refresh your API key")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
