use std::fmt;

use super::ExtractionResult;
use crate::utils::error::{AppError, FailureKind};

/// What the alert state machine decided for one checked job.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// Stock number absent or not one of the configured thresholds.
    NotTriggered,
    /// Threshold matched but was notified in an earlier run.
    AlreadyAlerted(i64),
    /// Notification delivered and recorded.
    Sent(i64),
    /// Threshold matched but nothing was delivered; not recorded.
    Skipped { threshold: i64, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Checked {
        result: ExtractionResult,
        alert: AlertOutcome,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub job_name: String,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn checked(job_name: &str, result: ExtractionResult, alert: AlertOutcome) -> Self {
        JobReport {
            job_name: job_name.to_string(),
            outcome: JobOutcome::Checked { result, alert },
        }
    }

    pub fn failed(job_name: &str, error: &AppError) -> Self {
        JobReport {
            job_name: job_name.to_string(),
            outcome: JobOutcome::Failed {
                kind: error.failure_kind(),
                message: error.detailed(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed { .. })
    }

    pub fn alert(&self) -> Option<&AlertOutcome> {
        match &self.outcome {
            JobOutcome::Checked { alert, .. } => Some(alert),
            JobOutcome::Failed { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.outcome {
            JobOutcome::Checked { result, .. } => Some(result),
            JobOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            JobOutcome::Checked { result, alert } => {
                write!(f, "[{}] {}", self.job_name, result)?;
                match alert {
                    AlertOutcome::NotTriggered => Ok(()),
                    AlertOutcome::AlreadyAlerted(threshold) => {
                        write!(f, " alert=already-sent({})", threshold)
                    }
                    AlertOutcome::Sent(threshold) => write!(f, " alert=sent({})", threshold),
                    AlertOutcome::Skipped { threshold, reason } => {
                        write!(f, " alert=skipped({}: {})", threshold, reason)
                    }
                }
            }
            JobOutcome::Failed { kind, message } => {
                write!(f, "[{}] ERROR ({}): {}", self.job_name, kind, message)
            }
        }
    }
}

/// Ordered per-job reports for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn push(&mut self, report: JobReport) {
        self.jobs.push(report);
    }

    pub fn alerts_sent(&self) -> usize {
        self.jobs
            .iter()
            .filter(|report| matches!(report.alert(), Some(AlertOutcome::Sent(_))))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs.iter().filter(|report| report.is_failure())
    }

    pub fn get(&self, job_name: &str) -> Option<&JobReport> {
        self.jobs.iter().find(|report| report.job_name == job_name)
    }

    pub fn lines(&self) -> Vec<String> {
        self.jobs.iter().map(ToString::to_string).collect()
    }
}
