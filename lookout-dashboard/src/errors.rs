use lookout_common::http::{HttpError, StatusCode};
use url::Url;

/// Why a single poll cycle produced no snapshot.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Request to {0} failed: {1}")]
    Transport(Url, HttpError),
    #[error("Unexpected status {1} from {0}")]
    Status(Url, StatusCode),
    #[error("Malformed snapshot from {0}: {1}")]
    Decode(Url, serde_json::Error),
}

impl FetchError {
    pub fn from_http(url: &Url, error: HttpError) -> Self {
        match error {
            HttpError::Status(status) => FetchError::Status(url.clone(), status),
            HttpError::Decode(err) => FetchError::Decode(url.clone(), err),
            // a body that fails mid-stream is still a transport failure
            other => FetchError::Transport(url.clone(), other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Http error: {0}")]
    Http(#[from] HttpError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Poll loop task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = core::result::Result<T, DashboardError>;
