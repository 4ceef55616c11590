//! # EventHub Testing
//!
//! Test doubles and fixtures for the EventHub client.
//!
//! This crate provides:
//! - Mock implementations of the environment traits ([`MockTransport`],
//!   [`InMemoryCredentialStore`], [`RecordingNavigator`], [`TestClock`])
//! - A fake token issuer ([`TokenAuthority`]) for refresh scenarios
//! - JSON fixtures shaped like backend responses
//! - proptest strategies
//!
//! ## Example
//!
//! ```ignore
//! use eventhub_testing::{InMemoryCredentialStore, MockTransport, RecordingNavigator, TokenAuthority};
//!
//! #[tokio::test]
//! async fn expired_token_is_refreshed() {
//!     let authority = TokenAuthority::new("nobody-has-this");
//!     let transport = MockTransport::new();
//!     transport.on("/v1/eventos/", authority.protected(fixtures::page_json(vec![])));
//!     transport.on(endpoints::REFRESH, authority.refresh());
//!
//!     let session = SessionManager::new(
//!         transport.clone(),
//!         InMemoryCredentialStore::with_tokens("stale", "refresh"),
//!         RecordingNavigator::new(),
//!         ClientConfig::default(),
//!     );
//!
//!     session.events().list(1).await.unwrap();
//!     assert_eq!(transport.refresh_calls(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use eventhub_core::Clock;

mod store;
mod transport;

pub use store::{InMemoryCredentialStore, RecordingNavigator, StoredCredentials};
pub use transport::{Handler, MockTransport, TokenAuthority};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::{TimeDelta, TimeZone};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Hand-driven clock for expiry tests.
    ///
    /// Time only moves when [`TestClock::advance`] is called. Clones share
    /// the same instant, so a test can keep one handle and give another to
    /// the code under test.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use eventhub_core::Clock;
    /// use eventhub_testing::test_clock;
    ///
    /// let clock = test_clock();
    /// let before = clock.now();
    /// clock.advance(TimeDelta::hours(24));
    /// assert_eq!(clock.now() - before, TimeDelta::hours(24));
    /// ```
    #[derive(Debug, Clone)]
    pub struct TestClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl TestClock {
        /// Clock stopped at `time`.
        #[must_use]
        pub fn at(time: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(time)),
            }
        }

        /// Move every clone of this clock forward by `by`.
        pub fn advance(&self, by: TimeDelta) {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *now += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Clock stopped at 2025-03-01 12:00:00 UTC.
    #[must_use]
    pub fn test_clock() -> TestClock {
        TestClock::at(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

/// JSON bodies shaped like the backend's responses.
pub mod fixtures {
    use eventhub_core::{Role, UserSummary};
    use serde_json::{Value, json};

    const TIMESTAMP: &str = "2025-01-01T00:00:00Z";

    /// A user with a predictable username and email.
    #[must_use]
    pub fn user(id: u64, role: Role) -> UserSummary {
        UserSummary {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            role,
            participante_id: (role == Role::Participante).then_some(id + 100),
        }
    }

    /// `user` as the backend serializes it.
    #[must_use]
    pub fn user_json(user: &UserSummary) -> Value {
        json!({
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "role": user.role,
            "participante_id": user.participante_id,
        })
    }

    /// An active, free, on-site event.
    #[must_use]
    pub fn evento_json(id: u64, titulo: &str) -> Value {
        json!({
            "id": id,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
            "is_deleted": false,
            "deleted_at": null,
            "titulo": titulo,
            "descricao": format!("Descrição de {titulo}"),
            "data_inicio": "2025-06-01T19:00:00Z",
            "data_fim": "2025-06-01T22:00:00Z",
            "local": "Auditório",
            "capacidade": 100,
            "is_active": true,
            "tipo": "presencial",
            "preco": "0.00",
            "organizer": 1,
            "organizer_nome": "Org",
        })
    }

    /// A subscription in `status`.
    #[must_use]
    pub fn inscricao_json(id: u64, evento: u64, status: &str) -> Value {
        json!({
            "id": id,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
            "participante": 101,
            "evento": evento,
            "participante_nome": "Ana",
            "evento_titulo": "Rust Meetup",
            "status": status,
            "data_inscricao": TIMESTAMP,
        })
    }

    /// A notification about `evento`.
    #[must_use]
    pub fn notificacao_json(id: u64, mensagem: &str, is_read: bool) -> Value {
        json!({
            "id": id,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
            "participante": 101,
            "organizador": null,
            "evento": 1,
            "participante_nome": "Ana",
            "evento_titulo": "Rust Meetup",
            "mensagem": mensagem,
            "is_read": is_read,
        })
    }

    /// A single page holding `results`.
    #[must_use]
    pub fn page_json(results: Vec<Value>) -> Value {
        json!({
            "count": results.len(),
            "next": null,
            "previous": null,
            "results": results,
        })
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Opaque token strings as the backend could issue them.
    #[must_use]
    pub fn token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.-]{8,40}"
    }

    /// Number of requests racing on an expired token.
    #[must_use]
    pub fn concurrency() -> impl Strategy<Value = usize> {
        1usize..=16
    }
}

/// Route test logs through the test harness's captured output.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{TestClock, test_clock};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use eventhub_core::model::{Evento, Inscricao, Notificacao, Paginated};
    use eventhub_core::{CredentialStore, Navigator, Role};

    #[test]
    fn clock_clones_share_one_instant() {
        let clock = test_clock();
        let handle = clock.clone();
        assert_eq!(clock.now().to_rfc3339(), "2025-03-01T12:00:00+00:00");

        handle.advance(chrono::TimeDelta::minutes(90));
        assert_eq!(clock.now().to_rfc3339(), "2025-03-01T13:30:00+00:00");
    }

    #[test]
    fn fixtures_decode_as_domain_types() {
        let page: Paginated<Evento> =
            serde_json::from_value(fixtures::page_json(vec![fixtures::evento_json(1, "Rust")]))
                .unwrap();
        assert_eq!(page.results[0].titulo, "Rust");
        assert!(page.results[0].is_free());

        let inscricao: Inscricao =
            serde_json::from_value(fixtures::inscricao_json(2, 1, "pendente")).unwrap();
        assert_eq!(inscricao.evento, 1);

        let notificacao: Notificacao =
            serde_json::from_value(fixtures::notificacao_json(3, "Oi", false)).unwrap();
        assert_eq!(notificacao.mensagem, "Oi");

        let user = fixtures::user(7, Role::Organizador);
        let decoded: eventhub_core::UserSummary =
            serde_json::from_value(fixtures::user_json(&user)).unwrap();
        assert_eq!(decoded, user);
    }

    #[tokio::test]
    async fn in_memory_store_clears_everything() {
        let store =
            InMemoryCredentialStore::with_session("a", "r", fixtures::user(1, Role::Participante));
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("a"));

        store.clear().await.unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn navigator_records_in_order() {
        let navigator = RecordingNavigator::new();
        navigator.redirect("/login");
        navigator.redirect("/home");
        assert_eq!(navigator.redirects(), vec!["/login", "/home"]);
        assert_eq!(navigator.last_redirect().as_deref(), Some("/home"));
    }
}
