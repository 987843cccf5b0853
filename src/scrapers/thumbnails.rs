//! Thumbnail downloads.
//!
//! Each article's thumbnail is fetched by URL and written under the output
//! directory. Downloads are not retried.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Trait for downloading a thumbnail into a local file.
#[async_trait]
pub trait ThumbnailFetcher: Send + Sync {
    /// Download `url` and write its bytes to `dest`.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> anyhow::Result<u64>;
}

/// Thumbnail downloader over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpThumbnails {
    client: reqwest::Client,
}

impl HttpThumbnails {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThumbnailFetcher for HttpThumbnails {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn download(&self, url: &str, dest: &Path) -> anyhow::Result<u64> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        fs::write(dest, &bytes).await?;
        debug!(bytes = bytes.len(), path = %dest.display(), "Wrote thumbnail");
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_invalid_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pic.jpg");
        let fetcher = HttpThumbnails::default();

        assert!(fetcher.download("not a url", &dest).await.is_err());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_unreachable_host_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pic.jpg");
        let fetcher = HttpThumbnails::new(reqwest::Client::new());

        assert!(fetcher
            .download("http://127.0.0.1:9/pic.jpg", &dest)
            .await
            .is_err());
        assert!(!dest.exists());
    }
}
