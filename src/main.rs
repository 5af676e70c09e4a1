use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stock_watcher::cli::Cli;
use stock_watcher::element_finder::ElementFinder;
use stock_watcher::plugins::notifiers::EmailNotifier;
use stock_watcher::scraper::HttpFetcher;
use stock_watcher::{AlertStateStore, JobRunner, SmtpConfig, WatchConfig};

const EXIT_STATE_WRITE: u8 = 1;
const EXIT_CONFIG: u8 = 2;
// EX_USAGE from sysexits.h
const EXIT_USAGE: u8 = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version come back as errors that print to stdout
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Settings already present in the environment win over the file.
    if let Err(e) = dotenvy::from_path(&cli.env_file) {
        if !e.not_found() {
            eprintln!("Failed to read {}: {}", cli.env_file.display(), e);
        }
    }

    let _log_guard = match init_tracing(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match WatchConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration {}: {}", cli.config.display(), e.detailed());
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_STATE_WRITE)
        }
    }
}

async fn run(cli: &Cli, config: WatchConfig) -> Result<()> {
    info!(
        "Starting Stock Watcher: {} checks from {}{}",
        config.checks.len(),
        cli.config.display(),
        if cli.dry_run { " (dry run)" } else { "" }
    );

    let smtp = SmtpConfig::from_env();
    if !smtp.is_configured() {
        info!("SMTP not configured; alerts will be logged but not sent");
    }

    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let runner = JobRunner::new(
        Box::new(fetcher),
        Box::new(ElementFinder::new()),
        Box::new(EmailNotifier::new(smtp)),
    )
    .with_request_timeout(config.request_timeout())
    .with_dry_run(cli.dry_run);

    let store = AlertStateStore::new(&cli.state);
    let mut state = store.load();

    let report = runner.run(&config.checks, &mut state).await;
    for line in report.lines() {
        println!("{}", line);
    }

    if cli.dry_run {
        info!("Dry run; state not saved");
        return Ok(());
    }

    store
        .save(&state)
        .with_context(|| format!("Failed to write state file {}", store.path().display()))?;
    Ok(())
}

fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("stock_watcher=info"))?;
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "stock-watcher.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()?;
            Ok(None)
        }
    }
}
