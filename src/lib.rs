pub mod alert_state;
pub mod cli;
pub mod config;
pub mod element_finder;
pub mod extractor;
pub mod models;
pub mod plugins;
pub mod runner;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use alert_state::{AlertState, AlertStateStore};
pub use config::{SmtpConfig, WatchConfig};
pub use extractor::extract;
pub use models::{ExtractionResult, Job, RunReport};
pub use plugins::trackers::parse_price;
pub use runner::JobRunner;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
