//! End-to-end tests of the reqwest transport against a local HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use eventhub_client::{ClientConfig, FileCredentialStore, ReqwestTransport, SessionManager};
use eventhub_core::{HttpRequest, StatusCode, Transport, TransportError, endpoints};
use eventhub_testing::{RecordingNavigator, fixtures, init_test_tracing};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> ReqwestTransport {
    let config = ClientConfig::builder()
        .base_url(format!("{}/api/", server.uri()))
        .request_timeout(Duration::from_secs(5))
        .build();
    ReqwestTransport::new(&config).unwrap()
}

#[tokio::test]
async fn sends_method_query_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/inscricoes/"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer tok"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "evento_id": 7 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = HttpRequest::post(endpoints::INSCRICOES)
        .with_query("page", 2)
        .with_body(json!({ "evento_id": 7 }));
    request.set_bearer("tok");

    let response = transport_for(&server).send(request).await.unwrap();

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json::<serde_json::Value>().unwrap()["ok"], true);
}

#[tokio::test]
async fn error_statuses_are_responses_not_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/eventos/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let response = transport_for(&server)
        .send(HttpRequest::get(endpoints::EVENTOS))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("expired"));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .request_timeout(Duration::from_millis(100))
        .build();
    let err = ReqwestTransport::new(&config)
        .unwrap()
        .send(HttpRequest::get(endpoints::EVENTOS))
        .await
        .unwrap_err();

    assert_eq!(err, TransportError::Timeout);
}

#[tokio::test]
async fn session_refreshes_over_http() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/eventos/"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/eventos/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::page_json(vec![fixtures::evento_json(1, "Rust")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({ "refresh": "long-lived" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .session_file(dir.path().join("session.json"))
        .build();
    let store = FileCredentialStore::new(&config.session_file);
    let seed = json!({ "auth_token": "stale", "refresh_token": "long-lived" });
    tokio::fs::write(store.path(), seed.to_string()).await.unwrap();

    let navigator = RecordingNavigator::new();
    let session = SessionManager::new(
        ReqwestTransport::new(&config).unwrap(),
        store,
        navigator.clone(),
        config,
    );

    let page = session.events().list(1).await.unwrap();

    assert_eq!(page.results[0].titulo, "Rust");
    assert!(navigator.redirects().is_empty());

    let saved: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(dir.path().join("session.json")).await.unwrap())
            .unwrap();
    assert_eq!(saved["auth_token"], "fresh");
    assert_eq!(saved["refresh_token"], "long-lived");
}
