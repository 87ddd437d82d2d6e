use super::*;
use uatu_stockcheck::core::reporter::{DEFAULT_FAILURE_SUBJECT, FAILURE_MESSAGE};
use uatu_stockcheck::core::{Expectation, ExtractionRule};
use uatu_stockcheck::{AppError, FailureReporter};

fn pattern_source(id: &str, location: String) -> Source {
    Source::new(
        id,
        location,
        ExtractionRule::PatternMatch {
            pattern: "Redbreast".to_string(),
            case_insensitive: false,
        },
        Expectation::FixedBaseline(0),
    )
}

#[tokio::test]
async fn test_fetch_failure_stops_run_and_reports_once() {
    let server = MockServer::start().await;
    serve_page(&server, "/one", listing_page(2)).await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let checker = env.checker(vec![
        pattern_source("one", format!("{}/one", server.uri())),
        pattern_source("two", format!("{}/two", server.uri())),
        pattern_source("three", format!("{}/three", server.uri())),
    ]);
    let reporter = FailureReporter::new(env.notifier.clone());

    let err = reporter.watch(checker.run()).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch { .. }));

    // Source one changed, but the digest is never sent once the run fails
    let messages = env.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, DEFAULT_FAILURE_SUBJECT);
    assert!(messages[0].1.starts_with(FAILURE_MESSAGE));
    assert!(!env.state_path().exists());

    server.verify().await;
}

#[tokio::test]
async fn test_corrupt_state_is_reported() {
    let server = MockServer::start().await;
    serve_page(&server, "/one", listing_page(0)).await;

    let env = TestEnv::new();
    std::fs::write(env.state_path(), "{ definitely not json").unwrap();

    let checker = env.checker(vec![pattern_source("one", format!("{}/one", server.uri()))]);
    let reporter = FailureReporter::new(env.notifier.clone()).with_subject("WHISKEY ERROR");

    let err = reporter.watch(checker.run()).await.unwrap_err();
    assert!(matches!(err, AppError::StateCorrupt { .. }));

    let messages = env.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "WHISKEY ERROR");
}

#[tokio::test]
async fn test_successful_run_sends_no_failure_report() {
    let server = MockServer::start().await;
    serve_page(&server, "/one", "no matches".to_string()).await;

    let env = TestEnv::new();
    let checker = env.checker(vec![pattern_source("one", format!("{}/one", server.uri()))]);
    let reporter = FailureReporter::new(env.notifier.clone());

    reporter.watch(checker.run()).await.unwrap();
    assert!(env.notifier.messages().is_empty());
}
