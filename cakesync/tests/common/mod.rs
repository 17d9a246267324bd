//! Shared helpers for cakesync integration tests.

#![allow(dead_code)]

use cakesync::{ApiClient, ClientConfig, DesiredConfig};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Start a mock StatusCake API.
pub async fn mock_api() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server.
pub fn client(server: &MockServer) -> ApiClient {
    let config = ClientConfig::new(API_KEY).with_base_url(server.uri());
    ApiClient::new(&config).expect("Failed to build client")
}

/// Desired configuration from a JSON object including `state`.
pub fn desired(value: Value) -> DesiredConfig {
    let map = value.as_object().cloned().expect("Desired state must be an object");
    DesiredConfig::from_map(map).expect("Invalid desired state")
}

/// Valid uptime test declaration.
pub fn uptime_desired(state: &str) -> Value {
    json!({
        "state": state,
        "name": "Example",
        "test_type": "HTTP",
        "website_url": "https://example.com",
        "check_rate": 300
    })
}

/// Uptime test as it appears in the listing.
pub fn uptime_entry(id: &str, name: &str, website_url: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "website_url": website_url,
        "test_type": "HTTP",
        "check_rate": 300,
        "paused": false
    })
}

/// Single-page listing response.
pub fn listing(entries: Value) -> Value {
    let count = entries.as_array().map(Vec::len).unwrap_or(0);
    json!({
        "data": entries,
        "metadata": {"page": 1, "per_page": 100, "page_count": 1, "total_count": count}
    })
}

/// Serve `entries` as the whole inventory at `collection`.
pub async fn mount_listing(server: &MockServer, collection: &str, entries: Value) {
    Mock::given(method("GET"))
        .and(path(collection))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(entries)))
        .mount(server)
        .await;
}

/// Serve `data` as the detail representation at `resource`, optionally only `times` times.
pub async fn mount_detail(server: &MockServer, resource: &str, data: Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(resource))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": data})));
    let mock = match times {
        Some(n) => mock.up_to_n_times(n),
        None => mock,
    };
    mock.mount(server).await;
}
