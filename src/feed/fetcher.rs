use crate::config::FetchSettings;
use crate::error::{Error, Result};
use crate::feed::parser::FeedParser;
use crate::feed::Preview;
use flate2::read::GzDecoder;
use reqwest::{Client, Response};
use std::io::Read;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout_duration: Duration,
    user_agent: String,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_max_redirects(10)
    }

    pub fn with_max_redirects(max_redirects: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout_duration: Duration::from_secs(30),
            user_agent: format!("newsgrab/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self::with_max_redirects(settings.max_redirects)
            .with_timeout(settings.timeout())
            .with_user_agent(settings.user_agent.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_duration = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Download a page as text. Bodies that are still gzip-compressed after
    /// transport decoding are inflated here.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching page: {}", url);

        let bytes = self.fetch_bytes(url, "text/html,application/xhtml+xml,*/*").await?;
        let bytes = decode_gzip(bytes)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Download an RSS/Atom feed and turn its entries into previews.
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<Preview>> {
        debug!("Fetching feed: {}", url);

        let parser = FeedParser::new();
        let bytes = self
            .fetch_bytes(url, "application/rss+xml, application/atom+xml, application/xml, text/xml, */*")
            .await?;
        let bytes = decode_gzip(bytes)?;

        parser.parse_feed(std::io::Cursor::new(bytes))
    }

    async fn fetch_bytes(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
        FeedParser::new().validate_feed_url(url)?;

        let response = timeout(self.timeout_duration, self.fetch_response(url, accept))
            .await
            .map_err(|_| Error::Timeout(format!("Request to {} timed out", url)))??;

        let status = response.status();
        if !(200..400).contains(&status.as_u16()) {
            warn!("HTTP {} for {}", status.as_u16(), url);
            return Err(Error::Transport(format!(
                "HTTP {} for {}: {}",
                status.as_u16(),
                url,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

        debug!("Downloaded {} bytes from {}", content.len(), url);
        Ok(content.to_vec())
    }

    async fn fetch_response(&self, url: &str, accept: &str) -> Result<Response> {
        self.client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request failed: {}", e)))
    }
}

/// Inflate a body that starts with the gzip magic; anything else passes through.
pub fn decode_gzip(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Transport(format!("Invalid gzip body: {}", e)))?;
    Ok(decoded)
}
