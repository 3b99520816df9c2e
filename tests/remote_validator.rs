//! HTTP collaborator tests against a local mock server: the validator
//! accepts only HTTP 200 and fails closed on errors and timeouts, and
//! the directory degrades to the unknown label.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use turnstile::core::types::{CallerId, ExternalId};
use turnstile::remote::http::{HttpDirectory, HttpValidator};
use turnstile::remote::IdentityValidator;
use turnstile::remote::CallerDirectory;

#[tokio::test]
async fn validator_accepts_http_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 123, "name": "somebody"
        })))
        .mount(&server)
        .await;

    let validator = HttpValidator::new(server.uri(), Duration::from_secs(1)).unwrap();
    assert!(validator.is_valid(ExternalId::new(123)).await);
}

#[tokio::test]
async fn validator_rejects_unknown_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let validator = HttpValidator::new(server.uri(), Duration::from_secs(1)).unwrap();
    assert!(!validator.is_valid(ExternalId::new(123)).await);
}

#[tokio::test]
async fn validator_fails_closed_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/123"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let validator = HttpValidator::new(server.uri(), Duration::from_secs(1)).unwrap();
    assert!(!validator.is_valid(ExternalId::new(123)).await);
}

#[tokio::test]
async fn validator_fails_closed_on_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/123"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let validator = HttpValidator::new(server.uri(), Duration::from_millis(50)).unwrap();
    assert!(!validator.is_valid(ExternalId::new(123)).await);
}

#[tokio::test]
async fn validator_fails_closed_when_unreachable() {
    // Nothing listens here.
    let validator =
        HttpValidator::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
    assert!(!validator.is_valid(ExternalId::new(123)).await);
}

#[tokio::test]
async fn directory_formats_name_and_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Alice"
        })))
        .mount(&server)
        .await;

    let directory = HttpDirectory::new(server.uri(), Duration::from_secs(1)).unwrap();
    let caller = CallerId::new("42").unwrap();
    assert_eq!(directory.display(&caller).await, "Alice (42)");
}

#[tokio::test]
async fn directory_degrades_to_unknown_label() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let directory = HttpDirectory::new(server.uri(), Duration::from_secs(1)).unwrap();
    let caller = CallerId::new("42").unwrap();
    assert_eq!(directory.display(&caller).await, "Unknown User (42)");
}

#[tokio::test]
async fn directory_degrades_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let directory = HttpDirectory::new(server.uri(), Duration::from_secs(1)).unwrap();
    let caller = CallerId::new("42").unwrap();
    assert_eq!(directory.display(&caller).await, "Unknown User (42)");
}
