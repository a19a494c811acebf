use std::sync::Arc;

use async_trait::async_trait;
use lookout_common::{
    operation::{admin_data_url, fetch_admin_data},
    types::ClusterSnapshot,
};
use url::Url;

use crate::errors::{FetchError, Result};

/// Produces one cluster snapshot per call. Implementations must be cheap to
/// call concurrently, ticks do not wait for each other.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self) -> core::result::Result<ClusterSnapshot, FetchError>;

    fn endpoint(&self) -> String;
}

pub type FetcherRef = Arc<dyn SnapshotFetcher>;

pub struct HttpFetcher {
    url: Url,
}

impl HttpFetcher {
    pub fn new(addr: &str) -> Result<Self> {
        Ok(Self {
            url: admin_data_url(addr)?,
        })
    }
}

#[async_trait]
impl SnapshotFetcher for HttpFetcher {
    async fn fetch(&self) -> core::result::Result<ClusterSnapshot, FetchError> {
        fetch_admin_data(&self.url)
            .await
            .map_err(|err| FetchError::from_http(&self.url, err))
    }

    fn endpoint(&self) -> String {
        self.url.to_string()
    }
}
