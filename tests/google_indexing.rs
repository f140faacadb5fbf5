mod common;

use common::{mount_token_endpoint, service_account_key};
use index_bot::domain::notifier::{SubmissionError, UrlNotifier};
use index_bot::infrastructure::google::{
    AuthError, IndexingApiClient, ServiceAccountAuth, ServiceAccountKey,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "indexer@project.iam.gserviceaccount.com";

async fn client_against(server: &MockServer) -> IndexingApiClient {
    let key = service_account_key(EMAIL, &format!("{}/token", server.uri()));
    let auth = ServiceAccountAuth::new(reqwest::Client::new(), key).unwrap();
    IndexingApiClient::with_endpoint(
        reqwest::Client::new(),
        auth,
        format!("{}/publish", server.uri()),
    )
}

#[tokio::test]
async fn test_publish_succeeds_and_reuses_cached_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/publish"))
        .and(header("authorization", "Bearer test-access-token"))
        .and(body_partial_json(json!({ "type": "URL_UPDATED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "urlNotificationMetadata": { "url": "https://example.com/a" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_against(&server).await;

    client.publish("https://example.com/a").await.unwrap();
    client.publish("https://example.com/b").await.unwrap();
    // The expect(1) on /token verifies the second publish reused the token.
}

#[tokio::test]
async fn test_token_exchange_uses_jwt_bearer_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "urlNotificationMetadata": {}
        })))
        .mount(&server)
        .await;

    let client = client_against(&server).await;
    client.publish("https://example.com/page").await.unwrap();
}

#[tokio::test]
async fn test_publish_maps_api_error_body() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded for quota metric 'Publish requests'",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let client = client_against(&server).await;
    let err = client.publish("https://example.com/page").await.unwrap_err();

    match err {
        SubmissionError::Service { code, message } => {
            assert_eq!(code, Some(429));
            assert!(message.contains("Quota exceeded"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_body_wins_over_http_success_status() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    // The API has been seen answering 200 with an error envelope; the body
    // decides the outcome.
    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 403, "message": "Permission denied on resource" }
        })))
        .mount(&server)
        .await;

    let client = client_against(&server).await;
    let err = client.publish("https://example.com/page").await.unwrap_err();

    match err {
        SubmissionError::Service { code, message } => {
            assert_eq!(code, Some(403));
            assert!(message.contains("Permission denied"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_error_status_is_reported_with_body_excerpt() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_against(&server).await;
    let err = client.publish("https://example.com/page").await.unwrap_err();

    match err {
        SubmissionError::Service { code, message } => {
            assert_eq!(code, Some(502));
            assert!(message.contains("Bad Gateway"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_endpoint_failure_surfaces_as_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_against(&server).await;
    let err = client.publish("https://example.com/page").await.unwrap_err();

    assert!(matches!(err, SubmissionError::Transport(_)));
}

#[tokio::test]
async fn test_unusable_private_key_fails_at_construction() {
    let raw = json!({
        "client_email": "broken@project.iam.gserviceaccount.com",
        "private_key": "not a pem at all",
        "token_uri": "http://localhost/token",
    })
    .to_string();
    let key = ServiceAccountKey::from_json(&raw).unwrap();

    let result = ServiceAccountAuth::new(reqwest::Client::new(), key);
    assert!(matches!(result, Err(AuthError::InvalidKey { .. })));
}
