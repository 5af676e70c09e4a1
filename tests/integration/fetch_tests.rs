use super::*;
use stock_watcher::models::{AlertOutcome, JobOutcome};
use stock_watcher::scraper::HttpFetcher;
use stock_watcher::utils::error::FailureKind;
use stock_watcher::AlertState;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_runner(notifier: &RecordingNotifier) -> anyhow::Result<JobRunner> {
    Ok(JobRunner::new(
        Box::new(HttpFetcher::new()?),
        Box::new(ElementFinder::new()),
        Box::new(notifier.clone()),
    )
    .with_request_timeout(Duration::from_secs(2)))
}

#[tokio::test]
async fn test_run_against_live_http_server() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widget"))
        .and(header("user-agent", "Mozilla/5.0 StockWatcher"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(3, "19,90")))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let job = widget_job(&format!("{}/widget", server.uri()))
        .with_header("User-Agent", "Mozilla/5.0 StockWatcher");

    let mut state = AlertState::default();
    let report = http_runner(&notifier)?.run(&[job], &mut state).await;

    let job_report = report.get("job").unwrap();
    assert_eq!(job_report.alert(), Some(&AlertOutcome::Sent(3)));
    assert_eq!(job_report.result().unwrap().price, Some(19.9));
    assert!(state.has_alerted("job", 3));
    println!("✓ {}", job_report);

    Ok(())
}

#[tokio::test]
async fn test_http_error_is_fetch_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let mut state = AlertState::default();
    let report = http_runner(&notifier)?
        .run(&[widget_job(&format!("{}/widget", server.uri()))], &mut state)
        .await;

    match &report.get("job").unwrap().outcome {
        JobOutcome::Failed { kind, message } => {
            assert_eq!(*kind, FailureKind::Fetch);
            assert!(message.contains("503"));
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
    assert!(report.lines()[0].starts_with("[job] ERROR (fetch):"));
    assert_eq!(notifier.sent_count(), 0);

    Ok(())
}
