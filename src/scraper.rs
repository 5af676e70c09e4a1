use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::plugins::traits::Fetcher;
use crate::utils::error::Result;

/// Sent unless a job configures its own `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("stock-watcher/", env!("CARGO_PKG_VERSION"));

/// Static-page fetcher over `reqwest`. No JavaScript rendering.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<String> {
        let start_time = std::time::Instant::now();

        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            "Fetched {} ({}, {} bytes) in {}ms",
            url,
            status,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body)
    }
}
