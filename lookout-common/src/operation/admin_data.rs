use tracing::debug;
use url::Url;

use crate::{
    anyhow,
    http::{HttpError, get_json},
    types::ClusterSnapshot,
};

pub const ADMIN_DATA_PATH: &str = "/admin-data";

/// Builds the admin-data endpoint for a provider.
///
/// `addr` is either a bare `host:port` or a base url with a scheme; any path on
/// the base url is replaced.
pub fn admin_data_url(addr: &str) -> Result<Url, HttpError> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(anyhow!("admin-data address can't be empty"));
    }

    let mut url = if addr.contains("://") {
        Url::parse(addr)?
    } else {
        Url::parse(&format!("http://{addr}"))?
    };
    url.set_path(ADMIN_DATA_PATH);
    url.set_query(None);
    Ok(url)
}

pub async fn fetch_admin_data(url: &Url) -> Result<ClusterSnapshot, HttpError> {
    let snapshot: ClusterSnapshot = get_json(url.clone()).await?;
    debug!(
        "admin-data from {url}: local {}, {} peers",
        snapshot.local.name,
        snapshot.others.len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    use super::{admin_data_url, fetch_admin_data};
    use crate::http::HttpError;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr.to_string()
    }

    #[test]
    fn test_admin_data_url() {
        let url = admin_data_url("127.0.0.1:20000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:20000/admin-data");

        let url = admin_data_url("https://ops.example.com/ui?x=1").unwrap();
        assert_eq!(url.as_str(), "https://ops.example.com/admin-data");

        assert!(admin_data_url("  ").is_err());
    }

    #[tokio::test]
    async fn test_fetch_admin_data() {
        let body = r#"{"Name":"node-a","Address":"127.0.0.1","Health":0,"State":"Alive",
            "NodesAlive":1,"MemStats":{"Alloc":1,"TotalAlloc":2,"Sys":3},"CPUs":8,
            "GoRoutines":11,"QueueCount":0,"Others":null}"#;
        let router = Router::new().route(
            "/admin-data",
            get(move || async move { ([("content-type", "application/json")], body) }),
        );
        let addr = serve(router).await;

        let snapshot = fetch_admin_data(&admin_data_url(&addr).unwrap())
            .await
            .unwrap();
        assert_eq!(snapshot.local.name.as_str(), "node-a");
        assert_eq!(snapshot.local.queue_count, Some(0));
        assert!(snapshot.others.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_admin_data_failures() {
        let router = Router::new().route(
            "/admin-data",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let addr = serve(router).await;
        let err = fetch_admin_data(&admin_data_url(&addr).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HttpError::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE
        ));

        let router = Router::new().route("/admin-data", get(|| async { "<html></html>" }));
        let addr = serve(router).await;
        let err = fetch_admin_data(&admin_data_url(&addr).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
    }
}
