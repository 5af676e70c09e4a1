use config::{Config, Environment, File, FileFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::element_finder::ElementFinder;
use crate::models::Job;
use crate::utils::error::{AppError, Result};

pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 25;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Stock Watcher";

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SEC
}

/// Contents of the job file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
    #[serde(default, alias = "jobs")]
    pub checks: Vec<Job>,
}

impl WatchConfig {
    pub fn new(checks: Vec<Job>) -> Self {
        Self {
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            checks,
        }
    }

    /// Loads the job file (JSON unless the extension says TOML or YAML),
    /// overlays `STOCK_WATCHER__*` environment variables and validates.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AppError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        };

        let settings = Config::builder()
            .set_default("request_timeout_sec", DEFAULT_REQUEST_TIMEOUT_SEC as i64)?
            .add_source(File::from(path).format(format))
            .add_source(
                Environment::with_prefix("STOCK_WATCHER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: WatchConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates an in-memory JSON document.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(data, FileFormat::Json))
            .build()?;
        let config: WatchConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_sec == 0 {
            return Err(AppError::Validation(
                "request_timeout_sec must be greater than 0".into(),
            ));
        }

        let mut names = HashSet::new();
        for (index, job) in self.checks.iter().enumerate() {
            validate_job(job).map_err(|e| {
                AppError::Validation(format!("check #{} ({}): {}", index + 1, job.name(), e))
            })?;

            if !names.insert(job.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate check name '{}'",
                    job.name()
                )));
            }
        }

        Ok(())
    }
}

fn validate_job(job: &Job) -> std::result::Result<(), String> {
    let url = Url::parse(&job.url).map_err(|e| format!("invalid url '{}': {}", job.url, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported url scheme '{}'", url.scheme()));
    }

    for selector in [job.in_stock_selector.as_deref(), job.price_selector.as_deref()]
        .into_iter()
        .flatten()
    {
        ElementFinder::parse_selector(selector).map_err(|e| e.to_string())?;
    }

    if let Some(pattern) = job.stock_number_regex.as_deref() {
        validate_pattern("stock_number_regex", pattern)?;
    }
    validate_pattern("price_regex", job.price_pattern())?;

    Ok(())
}

fn validate_pattern(field: &str, pattern: &str) -> std::result::Result<(), String> {
    let regex = Regex::new(pattern).map_err(|e| format!("{} is not a valid regex: {}", field, e))?;
    // captures_len counts the implicit whole-match group
    let groups = regex.captures_len() - 1;
    if groups != 1 {
        return Err(format!(
            "{} must have exactly one capturing group, found {}",
            field, groups
        ));
    }
    Ok(())
}

/// SMTP settings for the email notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub alert_to: Option<String>,
    pub from_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        SmtpConfig {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            alert_to: None,
            from_name: DEFAULT_FROM_NAME.to_string(),
        }
    }
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`,
    /// `SMTP_PASS`, `ALERT_TO` and `ALERT_FROM_NAME`. Empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("SMTP_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid SMTP_PORT '{}', using {}", raw, DEFAULT_SMTP_PORT);
                DEFAULT_SMTP_PORT
            }),
            None => DEFAULT_SMTP_PORT,
        };

        SmtpConfig {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port,
            username: get("SMTP_USER"),
            password: get("SMTP_PASS"),
            alert_to: get("ALERT_TO"),
            from_name: get("ALERT_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
        }
    }

    /// Email can only be sent with credentials and a recipient.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some() && self.alert_to.is_some()
    }
}
