use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pattern used for `price_regex` when a job does not set one.
pub const DEFAULT_PRICE_REGEX: &str = r"([0-9]+[.,]?[0-9]*)";

/// One monitored page: where to fetch it, what to extract and which stock
/// counts should raise an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub in_stock_selector: Option<String>,
    #[serde(default)]
    pub stock_number_regex: Option<String>,
    #[serde(default)]
    pub price_selector: Option<String>,
    #[serde(default)]
    pub price_regex: Option<String>,
    #[serde(default)]
    pub alert_stock_thresholds: Vec<i64>,
}

impl Job {
    pub fn new(url: impl Into<String>) -> Self {
        Job {
            name: None,
            url: url.into(),
            headers: BTreeMap::new(),
            in_stock_selector: None,
            stock_number_regex: None,
            price_selector: None,
            price_regex: None,
            alert_stock_thresholds: Vec::new(),
        }
    }

    /// Identifier used for diagnostics and alert state. Falls back to the URL
    /// when no name (or an empty one) is configured.
    pub fn name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.url,
        }
    }

    pub fn price_pattern(&self) -> &str {
        self.price_regex.as_deref().unwrap_or(DEFAULT_PRICE_REGEX)
    }

    pub fn is_threshold(&self, stock_number: i64) -> bool {
        self.alert_stock_thresholds.contains(&stock_number)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stock(mut self, selector: impl Into<String>, regex: Option<&str>) -> Self {
        self.in_stock_selector = Some(selector.into());
        self.stock_number_regex = regex.map(str::to_string);
        self
    }

    pub fn with_price(mut self, selector: impl Into<String>, regex: Option<&str>) -> Self {
        self.price_selector = Some(selector.into());
        self.price_regex = regex.map(str::to_string);
        self
    }

    pub fn with_thresholds(mut self, thresholds: impl IntoIterator<Item = i64>) -> Self {
        self.alert_stock_thresholds = thresholds.into_iter().collect();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
