use std::time::Duration;

use once_cell::sync::Lazy;
pub use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .expect("HTTP CLIENT initialize failed")
});

/// Issues a GET and decodes the body as JSON.
///
/// A non-2xx response is reported as [`HttpError::Status`] before the body is
/// read, and a body that does not match `T` as [`HttpError::Decode`].
pub async fn get_json<T: DeserializeOwned>(url: Url) -> Result<T, HttpError> {
    let response = HTTP_CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status(status));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[derive(thiserror::Error, Debug)]
pub enum HttpError {
    #[error("error: {0}")]
    Box(#[from] Box<dyn std::error::Error + Sync + Send>),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(StatusCode),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Url parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
