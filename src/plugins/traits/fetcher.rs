use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::utils::error::Result;

/// Capability for retrieving a page body. Non-success statuses and transport
/// failures are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<String>;
}
