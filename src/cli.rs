use clap::Parser;
use std::path::PathBuf;

/// Check product pages once and email when stock hits a configured count.
#[derive(Debug, Parser)]
#[command(name = "stock-watcher", version, about)]
pub struct Cli {
    /// Job list (JSON, TOML or YAML)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Alert state file, created on first save
    #[arg(short, long, default_value = "state.json")]
    pub state: PathBuf,

    /// Dotenv file holding SMTP settings; ignored when missing
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Also write daily-rotated logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Check and report without sending email or saving state
    #[arg(long)]
    pub dry_run: bool,
}
