use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::models::{ExtractionResult, Job};
use crate::utils::error::Result;
use crate::utils::text::escape_html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub html_body: String,
    /// Plain-text alternative. Derived from the HTML body when absent.
    pub text_body: Option<String>,
}

impl NotificationMessage {
    pub fn stock_alert(
        job: &Job,
        result: &ExtractionResult,
        threshold: i64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let name = job.name();
        let checked = checked_at.format("%Y-%m-%d %H:%M UTC");

        let mut html_body = format!(
            "<p>{} stock info:</p><p><b>{}</b></p>",
            escape_html(name),
            escape_html(&result.stock_text)
        );
        let mut text_body = format!("{} → {}\n", name, result.stock_text);

        if let Some(price) = result.price {
            html_body.push_str(&format!("<p>Price: {}</p>", price));
            text_body.push_str(&format!("Price: {}\n", price));
        }

        html_body.push_str(&format!(
            r#"<p><a href="{url}">{url}</a></p><p><small>Checked {checked}</small></p>"#,
            url = escape_html(&job.url),
            checked = checked
        ));
        text_body.push_str(&format!("URL: {}\nChecked {}\n", job.url, checked));

        NotificationMessage {
            subject: format!("STOCK ALERT: {} → {} left!", name, threshold),
            html_body,
            text_body: Some(text_body),
        }
    }
}

/// Outcome of a notification attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { message_id: Option<String> },
    /// Transport not usable (e.g. missing credentials). The alert must not be
    /// treated as delivered.
    Skipped { reason: String },
}

/// Capability for delivering alert messages (email and friends).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<Delivery>;
}
