// Integration tests for Stock Watcher
// These tests drive full runs through the public API with in-memory transports

pub mod cli_tests;
pub mod fetch_tests;

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stock_watcher::{
    AppError, Job, JobRunner, Result,
    element_finder::ElementFinder,
    plugins::traits::{Delivery, Fetcher, NotificationMessage, Notifier},
};

/// Serves canned pages by URL; unknown URLs fail like an unreachable host.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_page(&self, url: &str, html: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.to_string(), html.into());
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &str,
        _headers: &BTreeMap<String, String>,
        _timeout: Duration,
    ) -> Result<String> {
        self.pages.lock().unwrap().get(url).cloned().ok_or_else(|| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("connection refused: {}", url),
            ))
        })
    }
}

/// Captures every message it is asked to send.
#[derive(Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationMessage>>>,
    configured: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            configured: Arc::new(Mutex::new(true)),
        }
    }

    pub fn unconfigured() -> Self {
        let notifier = Self::new();
        notifier.set_configured(false);
        notifier
    }

    pub fn set_configured(&self, configured: bool) {
        *self.configured.lock().unwrap() = configured;
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<Delivery> {
        if !*self.configured.lock().unwrap() {
            return Ok(Delivery::Skipped {
                reason: "email transport not configured".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(Delivery::Sent {
            message_id: Some(format!("<{}@test>", self.sent_count())),
        })
    }
}

/// Product page in the shape most shops render stock and price.
pub fn product_page(stock: i64, price: &str) -> String {
    format!(
        r#"<html><body>
            <h1>Widget</h1>
            <div class="stock-info"><span>Only {} left</span> in stock</div>
            <span class="price">{}&nbsp;TL</span>
        </body></html>"#,
        stock, price
    )
}

pub fn widget_job(url: &str) -> Job {
    Job::new(url)
        .with_name("job")
        .with_stock(".stock-info", Some(r"Only (\d+) left"))
        .with_price(".price", None)
        .with_thresholds([3, 1])
}

pub fn create_test_runner(fetcher: &FakeFetcher, notifier: &RecordingNotifier) -> JobRunner {
    JobRunner::new(
        Box::new(fetcher.clone()),
        Box::new(ElementFinder::new()),
        Box::new(notifier.clone()),
    )
    .with_request_timeout(Duration::from_secs(5))
}
