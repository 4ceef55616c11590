//! Integration tests for login, registration, restore and logout.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use eventhub_client::{ClientConfig, SessionManager, SessionState};
use eventhub_core::model::Registration;
use eventhub_core::{HttpResponse, Role, StatusCode, endpoints};
use eventhub_testing::{
    InMemoryCredentialStore, MockTransport, RecordingNavigator, fixtures, init_test_tracing,
};
use serde_json::json;

type TestSession = SessionManager<MockTransport, InMemoryCredentialStore, RecordingNavigator>;

fn session_with(store: InMemoryCredentialStore) -> (TestSession, MockTransport) {
    init_test_tracing();
    let transport = MockTransport::new();
    let session = SessionManager::new(
        transport.clone(),
        store,
        RecordingNavigator::new(),
        ClientConfig::default(),
    );
    (session, transport)
}

#[tokio::test]
async fn login_stores_tokens_and_profile() {
    let (session, transport) = session_with(InMemoryCredentialStore::new());
    let user = fixtures::user(4, Role::Participante);
    transport.respond(
        endpoints::LOGIN,
        StatusCode::OK,
        json!({ "access": "a1", "refresh": "r1" }),
    );
    let profile = json!({ "user": fixtures::user_json(&user) });
    transport.on(endpoints::ME, move |request| {
        let status = if request.bearer() == Some("a1") {
            StatusCode::OK
        } else {
            StatusCode::UNAUTHORIZED
        };
        Ok(HttpResponse::json_body(status, &profile))
    });

    let established = session.login("user4", "secret").await.unwrap();

    assert_eq!(established.access_token, "a1");
    assert_eq!(established.refresh_token, "r1");
    assert_eq!(established.user, user);

    let login = &transport.calls_to(endpoints::LOGIN)[0];
    assert_eq!(
        login.body,
        Some(json!({ "username": "user4", "password": "secret" }))
    );

    let stored = session.store().snapshot();
    assert_eq!(stored.access_token.as_deref(), Some("a1"));
    assert_eq!(stored.user.as_ref(), Some(&user));
    assert_eq!(session.state().await.unwrap(), SessionState::Valid);
    assert!(!session.is_organizer().await.unwrap());
}

#[tokio::test]
async fn login_without_profile_discards_tokens() {
    let (session, transport) = session_with(InMemoryCredentialStore::new());
    transport.respond(
        endpoints::LOGIN,
        StatusCode::OK,
        json!({ "access": "a1", "refresh": "r1" }),
    );
    transport.respond(
        endpoints::ME,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "down" }),
    );

    let err = session.login("user4", "secret").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(session.store().snapshot().is_empty());
}

#[tokio::test]
async fn register_signs_in_with_returned_tokens() {
    let (session, transport) = session_with(InMemoryCredentialStore::new());
    transport.respond(
        endpoints::REGISTER,
        StatusCode::CREATED,
        json!({
            "access": "a9",
            "refresh": "r9",
            "user": { "id": 9, "username": "acme", "participante_id": null },
        }),
    );

    let registration = Registration::organizer(
        "acme",
        "secret",
        "Acme Eventos",
        "contato@acme.com",
        "Acme",
        Some("  ".to_string()),
    );
    let established = session.register(&registration).await.unwrap();

    assert_eq!(established.user.id, 9);
    assert_eq!(established.user.email, "contato@acme.com");
    assert_eq!(established.user.role, Role::Organizador);
    assert!(session.is_organizer().await.unwrap());

    let body = transport.calls_to(endpoints::REGISTER)[0].body.clone().unwrap();
    assert_eq!(body["role"], "organizador");
    assert_eq!(body["empresa"], "Acme");
    assert!(body.get("telefone").is_none());
}

#[tokio::test]
async fn register_surfaces_field_errors() {
    let (session, transport) = session_with(InMemoryCredentialStore::new());
    transport.respond(
        endpoints::REGISTER,
        StatusCode::BAD_REQUEST,
        json!({ "username": ["A user with that username already exists."] }),
    );

    let err = session
        .register(&Registration::participant("ana", "pw", "Ana", "ana@example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert!(err.to_string().contains("already exists"));
    assert!(session.store().snapshot().is_empty());
}

#[tokio::test]
async fn restore_requires_complete_session() {
    let user = fixtures::user(1, Role::Participante);
    let (full, _) = session_with(InMemoryCredentialStore::with_session("a", "r", user.clone()));
    let restored = full.restore_session().await.unwrap().unwrap();
    assert_eq!(restored.user, user);
    assert_eq!(full.current_user().await.unwrap(), Some(user));

    let (partial, _) = session_with(InMemoryCredentialStore::with_tokens("a", "r"));
    assert!(partial.restore_session().await.unwrap().is_none());
    assert!(!partial.is_organizer().await.unwrap());
}

#[tokio::test]
async fn logout_clears_every_key() {
    let user = fixtures::user(1, Role::Organizador);
    let (session, _) = session_with(InMemoryCredentialStore::with_session("a", "r", user));

    session.logout().await.unwrap();

    assert!(session.store().snapshot().is_empty());
    assert!(session.restore_session().await.unwrap().is_none());
    assert_eq!(session.state().await.unwrap(), SessionState::LoggedOut);
}
