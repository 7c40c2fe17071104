// tests/sinks_web.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gaze::behaviour::web::WebSink;
use gaze::behaviour::{BehaviourRouter, Notifier, RealSinkBackend, SinkStatus};
use gaze::config::{SinkKind, WebSettings};
use gaze::report::Report;
use gaze::types::{HttpMethod, LogFormat, WhenPolicy};
use gaze_test_utils::builders::{SinkSetBuilder, logfile_sink, report_with_exit, web_sink};

type TestResult = Result<(), Box<dyn Error>>;

fn settings_of(kind: SinkKind) -> WebSettings {
    match kind {
        SinkKind::Web(settings) => settings,
        other => panic!("expected web sink, got {other:?}"),
    }
}

#[tokio::test]
async fn posts_json_with_configured_headers() -> TestResult {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(header("x-gaze-token", "secret"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_of(web_sink(
        &format!("{}/hook", server.uri()),
        HttpMethod::Post,
        &[("X-Gaze-Token", "secret")],
    ));
    let report = report_with_exit(0);
    WebSink::new(&settings, reqwest::Client::new()).notify(&report).await?;

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: Report = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(body.name, report.name);
    assert_eq!(body.hostname, "test-host");
    Ok(())
}

#[tokio::test]
async fn put_is_honoured() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("thanks"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_of(web_sink(&server.uri(), HttpMethod::Put, &[]));
    WebSink::new(&settings, reqwest::Client::new())
        .notify(&report_with_exit(1))
        .await?;
    Ok(())
}

#[tokio::test]
async fn server_error_fails_with_status_code() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let settings = settings_of(web_sink(&server.uri(), HttpMethod::Post, &[]));
    let err = WebSink::new(&settings, reqwest::Client::new())
        .notify(&report_with_exit(0))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed with code 500"), "{err}");
    Ok(())
}

#[tokio::test]
async fn server_error_does_not_stop_dispatch() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir()?;

    let sinks = SinkSetBuilder::new()
        .with_sink("a-web", WhenPolicy::Always, web_sink(&server.uri(), HttpMethod::Post, &[]))
        .with_sink(
            "b-log",
            WhenPolicy::Always,
            logfile_sink(dir.path(), "gaze.log", LogFormat::Machine),
        )
        .build();

    let router = BehaviourRouter::new(RealSinkBackend::new()?);
    let outcomes = router.dispatch(&report_with_exit(0), &sinks).await;

    let web = outcomes.iter().find(|o| o.name == "a-web").unwrap();
    assert!(matches!(&web.status, SinkStatus::Failed(m) if m.contains("500")));
    let log = outcomes.iter().find(|o| o.name == "b-log").unwrap();
    assert_eq!(log.status, SinkStatus::Succeeded);
    assert!(dir.path().join("gaze.log").exists());
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_a_sink_failure() -> TestResult {
    // Nothing listens on port 9 (discard) in the test environment.
    let settings = settings_of(web_sink("http://127.0.0.1:9/", HttpMethod::Post, &[]));
    let result = WebSink::new(&settings, reqwest::Client::new())
        .notify(&report_with_exit(0))
        .await;
    assert!(result.unwrap_err().to_string().contains("could not be sent"));
    Ok(())
}
