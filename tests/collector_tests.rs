//! Collector notification integration tests

use vibecap::application::ports::{CollectorError, CollectorNotifier};
use vibecap::infrastructure::HttpCollectorNotifier;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn notifies_completion_with_vibration_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recording_complete"))
        .and(query_param("vibration", "true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = HttpCollectorNotifier::new(server.uri());
    notifier.recording_complete(true).await.unwrap();
}

#[tokio::test]
async fn notifies_completion_without_vibration() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recording_complete"))
        .and(query_param("vibration", "false"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = HttpCollectorNotifier::new(server.uri());
    notifier.recording_complete(false).await.unwrap();
}

#[tokio::test]
async fn collector_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recording_complete"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = HttpCollectorNotifier::new(server.uri());
    let result = notifier.recording_complete(true).await;

    assert!(matches!(result, Err(CollectorError::BadStatus(500))));
}

#[tokio::test]
async fn unreachable_collector_is_a_request_failure() {
    // Reserved port; nothing listens here
    let notifier = HttpCollectorNotifier::new("http://127.0.0.1:1");
    let result = notifier.recording_complete(false).await;

    assert!(matches!(result, Err(CollectorError::RequestFailed(_))));
}
