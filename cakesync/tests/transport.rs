//! Transport classification tests.

mod common;

use cakesync::{ApiClient, ClientConfig, Outcome};
use reqwest::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{API_KEY, client, mock_api};

#[tokio::test]
async fn test_success_returns_parsed_body() {
    let server = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/v1/uptime/1"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).request(Method::GET, "/v1/uptime/1", None).await;

    match outcome {
        Outcome::Success { status, body } => {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, Some(json!({"data": {"id": "1"}})));
        }
        Outcome::Failure(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[tokio::test]
async fn test_no_content_has_empty_body() {
    let server = mock_api().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/uptime/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (status, body) = client(&server)
        .request(Method::DELETE, "/v1/uptime/1", None)
        .await
        .into_result()
        .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_too_many_requests_uses_reason_phrase() {
    let server = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/v1/uptime"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let outcome = client(&server).request(Method::GET, "/v1/uptime", None).await;
    assert!(!outcome.is_success());

    let failure = outcome.into_result().unwrap_err();
    assert_eq!(failure.status, Some(StatusCode::TOO_MANY_REQUESTS));
    assert!(failure.message.contains("Too Many Requests"));
}

#[tokio::test]
async fn test_failed_status_code_uses_json_message() {
    let server = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/v1/uptime"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Bad Error"})))
        .mount(&server)
        .await;

    let failure = client(&server)
        .request(Method::GET, "/v1/uptime", None)
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.status, Some(StatusCode::BAD_REQUEST));
    assert!(failure.message.contains("Bad Error"));
}

#[tokio::test]
async fn test_unreachable_server_is_failure_without_status() {
    // Nothing listens on the discard port locally.
    let config = ClientConfig::new(API_KEY).with_base_url("http://127.0.0.1:9");
    let client = ApiClient::new(&config).unwrap();

    let failure = client
        .request(Method::GET, "/v1/uptime", None)
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.status, None);
    assert!(!failure.message.is_empty());
}
