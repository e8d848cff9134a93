use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use std::time::Duration;

use super::{parse_payload, FeedItem};
use crate::error::{FlapboardError, Result};
use crate::log_debug;

/// HTTP client for the price feed. Every request bypasses caches.
#[derive(Debug, Clone)]
pub struct FeedClient {
    url: String,
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn no_cache_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }

    pub async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let response = self.client
            .get(&self.url)
            .headers(Self::no_cache_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlapboardError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        log_debug!("feed body: {} bytes", body.len());
        parse_payload(&body)
    }
}
