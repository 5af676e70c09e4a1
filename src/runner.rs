use chrono::Utc;
use std::time::Duration;

use crate::alert_state::AlertState;
use crate::config::DEFAULT_REQUEST_TIMEOUT_SEC;
use crate::extractor::PageExtractor;
use crate::models::{AlertOutcome, ExtractionResult, Job, JobReport, RunReport};
use crate::plugins::traits::{Delivery, DocumentSelector, Fetcher, NotificationMessage, Notifier};
use crate::utils::error::Result;

/// Checks jobs one after another and fires threshold alerts at most once
/// per `(job, threshold)`.
pub struct JobRunner {
    fetcher: Box<dyn Fetcher>,
    selector: Box<dyn DocumentSelector>,
    notifier: Box<dyn Notifier>,
    request_timeout: Duration,
    dry_run: bool,
}

impl JobRunner {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        selector: Box<dyn DocumentSelector>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            selector,
            notifier,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SEC),
            dry_run: false,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Decide alerts without sending anything or touching the state.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every job in order. A failing job is reported and the run
    /// moves on; `state` only gains entries for delivered alerts.
    pub async fn run(&self, jobs: &[Job], state: &mut AlertState) -> RunReport {
        let mut report = RunReport::default();
        for job in jobs {
            report.push(self.run_job(job, state).await);
        }

        tracing::info!(
            "Run finished: {} checks, {} alerts sent, {} failed",
            report.jobs.len(),
            report.alerts_sent(),
            report.failures().count()
        );
        report
    }

    pub async fn run_job(&self, job: &Job, state: &mut AlertState) -> JobReport {
        let name = job.name();
        tracing::info!("Checking: {}", name);

        let result = match self.check_job(job).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Check failed for {}: {}", name, e);
                return JobReport::failed(name, &e);
            }
        };

        match self.evaluate_alert(job, &result, state).await {
            Ok(alert) => JobReport::checked(name, result, alert),
            Err(e) => {
                tracing::error!("Alert failed for {}: {}", name, e);
                JobReport::failed(name, &e)
            }
        }
    }

    async fn check_job(&self, job: &Job) -> Result<ExtractionResult> {
        let html = self
            .fetcher
            .fetch(&job.url, &job.headers, self.request_timeout)
            .await?;
        PageExtractor::new(self.selector.as_ref()).extract(&html, job)
    }

    async fn evaluate_alert(
        &self,
        job: &Job,
        result: &ExtractionResult,
        state: &mut AlertState,
    ) -> Result<AlertOutcome> {
        let name = job.name();
        let Some(stock_number) = result.stock_number.filter(|n| job.is_threshold(*n)) else {
            return Ok(AlertOutcome::NotTriggered);
        };

        if state.has_alerted(name, stock_number) {
            tracing::debug!("Threshold {} already alerted for {}", stock_number, name);
            return Ok(AlertOutcome::AlreadyAlerted(stock_number));
        }

        if self.dry_run {
            return Ok(AlertOutcome::Skipped {
                threshold: stock_number,
                reason: "dry run".to_string(),
            });
        }

        let message = NotificationMessage::stock_alert(job, result, stock_number, Utc::now());
        match self.notifier.send_notification(&message).await? {
            Delivery::Sent { .. } => {
                state.record(name, stock_number);
                tracing::info!("ALERT sent for {} at stock {}", name, stock_number);
                Ok(AlertOutcome::Sent(stock_number))
            }
            Delivery::Skipped { reason } => {
                tracing::warn!(
                    "Alert for {} at stock {} not delivered ({}); will retry next run",
                    name,
                    stock_number,
                    reason
                );
                Ok(AlertOutcome::Skipped {
                    threshold: stock_number,
                    reason,
                })
            }
        }
    }
}
