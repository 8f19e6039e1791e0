//! Retry behavior of the shared HTTP client against a live mock server

use crate::common::{fast_client, timeout_client};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_transient_status_then_success() {
    let mock_server = MockServer::start().await;

    // First request gets a 503, the next one succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client();
    let body = client
        .get_text(&format!("{}/flaky", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fast_client()
        .get_text(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_retries_exhausted_surface_last_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = fast_client()
        .get_text(&format!("{}/down", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("HTTP 502"));
}

#[tokio::test]
async fn test_rate_limit_fails_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fast_client()
        .get_text(&format!("{}/busy", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn test_connection_refused_is_reported() {
    // Nothing listens on port 1
    let err = fast_client()
        .get_text("http://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert_eq!(err.status(), None);
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_timeouts_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = timeout_client(Duration::from_millis(100))
        .get_text(&format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert!(err.to_string().contains("timed out"), "{}", err);
}
