//! Environment traits - the injected dependencies of the session manager.
//!
//! Production code wires the reqwest transport and the file credential store
//! from `eventhub-client`; tests wire the mocks from `eventhub-testing`.

use crate::error::{StoreError, TransportError};
use crate::model::UserSummary;
use crate::request::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use std::future::Future;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sends a single request descriptor to the backend.
///
/// A transport never interprets status codes: any response that arrives,
/// 2xx or not, is returned as `Ok`.
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns error if no HTTP response was obtained (connection refused,
    /// timeout, malformed request).
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Durable storage for the session credentials.
///
/// Three values live under fixed keys: the access token, the refresh token
/// and the serialized user. `clear` removes all three.
pub trait CredentialStore: Send + Sync {
    /// Current access token.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn access_token(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Current refresh token.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn refresh_token(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Signed-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read or the stored user
    /// cannot be decoded.
    fn user(&self) -> impl Future<Output = Result<Option<UserSummary>, StoreError>> + Send;

    /// Replace the access token.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn set_access_token(&self, token: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace the refresh token.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn set_refresh_token(&self, token: &str)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace the stored user.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn set_user(&self, user: &UserSummary) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove every session key.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Navigation hook used when the session cannot be recovered.
pub trait Navigator: Send + Sync {
    /// Send the user to `route` (the login view).
    fn redirect(&self, route: &str);
}
