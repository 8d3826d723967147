//! Where the status document is fetched from

use crate::errors::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// A place the status document can be retrieved from
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Retrieve the raw document body
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human readable location, for logs
    fn location(&self) -> String;
}

/// Build a source from a configured location.
///
/// `http://` and `https://` locations are fetched over HTTP, anything else
/// (optionally prefixed with `file://`) is read from disk.
pub fn from_location(location: &str, http_timeout: Duration) -> Result<Box<dyn StatusSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(Box::new(HttpSource::new(location.to_string(), http_timeout)?));
    }

    let path = location.strip_prefix("file://").unwrap_or(location);
    if path.is_empty() {
        return Err(DashboardError::Config("status source cannot be empty".to_string()));
    }

    Ok(Box::new(FileSource::new(path)))
}

/// HTTP source for the status document
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: String, http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("status_dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DashboardError::Network)?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Fetching status document from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(DashboardError::Network)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Status source {} answered {}", self.url, status);
            return Err(DashboardError::NetworkStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await.map_err(DashboardError::Network)?;
        debug!("Received {} bytes from {}", body.len(), self.url);

        Ok(body.to_vec())
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Status document stored on local disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StatusSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Reading status document from {}", self.path.display());
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_source_selection() {
        let timeout = Duration::from_secs(5);

        let http = from_location("https://example.com/pingdata.json", timeout).unwrap();
        assert_eq!(http.location(), "https://example.com/pingdata.json");

        let file = from_location("file:///tmp/pingdata.json", timeout).unwrap();
        assert_eq!(file.location(), "/tmp/pingdata.json");

        assert!(from_location("", timeout).is_err());
    }

    #[tokio::test]
    async fn test_http_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pingdata.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = HttpSource::new(
            format!("{}/pingdata.json", mock_server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(source.fetch().await.unwrap(), b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let source = HttpSource::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, DashboardError::NetworkStatus { status: 503, .. }));
        assert_eq!(err.kind(), "NetworkError");
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        // Nothing listens on port 9 locally
        let source = HttpSource::new("http://127.0.0.1:9/".to_string(), Duration::from_secs(2)).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert_eq!(err.kind(), "NetworkError");
    }

    #[tokio::test]
    async fn test_file_fetch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"svc1": {{}}}}"#).unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), br#"{"svc1": {}}"#.to_vec());

        let missing = FileSource::new("/definitely/not/here.json");
        assert_eq!(missing.fetch().await.unwrap_err().kind(), "IoError");
    }
}
