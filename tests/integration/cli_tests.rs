use super::*;
use serde_json::json;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCRUBBED_ENV: &[&str] = &[
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASS",
    "ALERT_TO",
    "ALERT_FROM_NAME",
    "STOCK_WATCHER__REQUEST_TIMEOUT_SEC",
];

/// Runs the binary inside `dir` with SMTP unconfigured, so config.json and
/// state.json resolve to files in `dir` by default.
async fn run_watcher(dir: &Path, args: &[&str]) -> anyhow::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stock-watcher"));
    command
        .args(args)
        .arg("--env-file")
        .arg(dir.join("missing.env"))
        .current_dir(dir);
    for key in SCRUBBED_ENV {
        command.env_remove(key);
    }
    Ok(command.output().await?)
}

fn write_config(dir: &Path, checks: serde_json::Value) -> anyhow::Result<()> {
    let config = json!({"request_timeout_sec": 5, "checks": checks});
    std::fs::write(dir.join("config.json"), config.to_string())?;
    Ok(())
}

fn widget_check(url: &str) -> serde_json::Value {
    json!({
        "name": "job",
        "url": url,
        "in_stock_selector": ".stock-info",
        "stock_number_regex": "Only (\\d+) left",
        "price_selector": ".price",
        "alert_stock_thresholds": [3, 1]
    })
}

fn read_state(dir: &Path) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(dir.join("state.json"))?)?)
}

async fn widget_server(stock: i64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widget"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(stock, "19,90")))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_run_saves_state_after_all_jobs() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = widget_server(3).await;
    write_config(
        dir.path(),
        json!([
            widget_check(&format!("{}/widget", server.uri())),
            {"name": "down", "url": format!("{}/gone", server.uri())}
        ]),
    )?;
    std::fs::write(dir.path().join("state.json"), r#"{"alerts": {"job": ["3"]}}"#)?;

    let output = run_watcher(dir.path(), &[]).await?;
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "[job] stock_text='Only 3 left in stock' stock_number=3 price=19.9 alert=already-sent(3)"
    );
    assert!(lines[1].starts_with("[down] ERROR (fetch):"), "{}", lines[1]);
    println!("✓ Both jobs reported, failure did not change the exit status");

    assert_eq!(read_state(dir.path())?, json!({"alerts": {"job": ["3"]}}));
    assert!(!dir.path().join("state.json.tmp").exists());
    println!("✓ State rewritten once at the end of the run");

    Ok(())
}

#[tokio::test]
async fn test_first_run_creates_state_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = widget_server(3).await;
    write_config(dir.path(), json!([widget_check(&format!("{}/widget", server.uri()))]))?;

    let output = run_watcher(dir.path(), &[]).await?;
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("alert=skipped(3: email transport not configured)"), "{}", stdout);
    // Unsent alerts stay unrecorded so the next run retries them
    assert_eq!(read_state(dir.path())?, json!({"alerts": {}}));

    Ok(())
}

#[tokio::test]
async fn test_dry_run_never_writes_state() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = widget_server(3).await;
    write_config(dir.path(), json!([widget_check(&format!("{}/widget", server.uri()))]))?;

    let output = run_watcher(dir.path(), &["--dry-run"]).await?;
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("alert=skipped(3: dry run)"), "{}", stdout);
    assert!(!dir.path().join("state.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_config_exits_with_config_status() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let output = run_watcher(dir.path(), &["--config", "absent.json"]).await?;
    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("state.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_invalid_config_exits_with_config_status() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(dir.path(), json!([{"url": "ftp://shop.example.com/widget"}]))?;

    let output = run_watcher(dir.path(), &[]).await?;
    assert_eq!(output.status.code(), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_state_write_failure_exits_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(dir.path(), json!([]))?;

    let output = run_watcher(dir.path(), &["--state", "no-such-dir/state.json"]).await?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_usage_errors_are_distinct_from_config_errors() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let output = run_watcher(dir.path(), &["--bogus"]).await?;
    assert_eq!(output.status.code(), Some(64));
    assert!(!String::from_utf8(output.stderr)?.is_empty());

    let help = run_watcher(dir.path(), &["--help"]).await?;
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8(help.stdout)?.contains("--dry-run"));

    let version = run_watcher(dir.path(), &["--version"]).await?;
    assert_eq!(version.status.code(), Some(0));

    Ok(())
}
