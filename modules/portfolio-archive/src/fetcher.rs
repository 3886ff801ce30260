// Page fetching for attribution checks: HTTP GET + visible-text extraction.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::text_extract::visible_text;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its visible text (scripts, styles and
    /// navigation chrome removed).
    async fn page_text(&self, url: &str) -> Result<String>;
}

/// Build the shared reqwest client: fixed timeout, redirects followed.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ArchiveError::Client(e.to_string()))
}

/// Parse `url` and reject anything that isn't http(s).
pub(crate) fn http_url(url: &str) -> Result<url::Url> {
    let candidate = if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    };
    let parsed = url::Url::parse(&candidate).map_err(|_| ArchiveError::InvalidUrl(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ArchiveError::InvalidUrl(format!(
            "only http/https URLs are allowed, got {}",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn page_text(&self, url: &str) -> Result<String> {
        let target = http_url(url)?;
        debug!(url, fetcher = "http", "Fetching page");

        let resp = self.client.get(target).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ArchiveError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = resp.text().await?;
        let text = visible_text(&html);
        debug!(url, fetcher = "http", bytes = html.len(), chars = text.len(), "Fetched page");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_relative_urls_default_to_https() {
        let parsed = http_url("//cdn.example.com/a.png").unwrap();
        assert_eq!(parsed.scheme(), "https");
        assert_eq!(parsed.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(matches!(http_url("ftp://example.com/file"), Err(ArchiveError::InvalidUrl(_))));
        assert!(matches!(http_url("not a url"), Err(ArchiveError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_request() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1), "test-agent").unwrap();
        let err = fetcher.page_text("javascript:alert(1)").await.unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidUrl(_)));
    }
}
