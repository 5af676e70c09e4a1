use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::Result;

/// Which thresholds have already been notified, per job name.
///
/// Threshold values are stored as strings to stay compatible with existing
/// `state.json` files. Jobs keep the order they were first recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    #[serde(default)]
    pub alerts: IndexMap<String, Vec<String>>,
}

impl AlertState {
    pub fn has_alerted(&self, job_name: &str, threshold: i64) -> bool {
        let key = threshold.to_string();
        self.alerts
            .get(job_name)
            .is_some_and(|thresholds| thresholds.contains(&key))
    }

    /// Marks `threshold` as notified for `job_name`. Returns `false` if it
    /// was already recorded.
    pub fn record(&mut self, job_name: &str, threshold: i64) -> bool {
        let key = threshold.to_string();
        let thresholds = self.alerts.entry(job_name.to_string()).or_default();
        if thresholds.contains(&key) {
            return false;
        }
        thresholds.push(key);
        true
    }

    pub fn alerted_thresholds(&self, job_name: &str) -> &[String] {
        self.alerts.get(job_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// JSON file holding the [`AlertState`] between runs.
#[derive(Debug, Clone)]
pub struct AlertStateStore {
    path: PathBuf,
}

impl AlertStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state starts from scratch.
    pub fn load(&self) -> AlertState {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No alert state at {}, starting empty", self.path.display());
                return AlertState::default();
            }
            Err(e) => {
                tracing::warn!("Could not read alert state {}: {}", self.path.display(), e);
                return AlertState::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Ignoring malformed alert state {}: {}", self.path.display(), e);
                AlertState::default()
            }
        }
    }

    /// Replaces the whole file. The new content is written next to the
    /// target and renamed over it.
    pub fn save(&self, state: &AlertState) -> Result<()> {
        let data = serde_json::to_string_pretty(state)?;

        let mut tmp_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Saved alert state to {}", self.path.display());
        Ok(())
    }
}
