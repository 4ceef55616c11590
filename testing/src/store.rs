//! In-memory [`CredentialStore`] and a recording [`Navigator`].

use eventhub_core::{CredentialStore, Navigator, StoreError, UserSummary};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of everything a credential store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Access token
    pub access_token: Option<String>,
    /// Refresh token
    pub refresh_token: Option<String>,
    /// Signed-in user
    pub user: Option<UserSummary>,
}

impl StoredCredentials {
    /// Nothing stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Credential store kept in memory. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<Mutex<StoredCredentials>>,
    access_failure: Arc<Mutex<Option<StoreError>>>,
}

impl InMemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a token pair but no user.
    #[must_use]
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self::from_snapshot(StoredCredentials {
            access_token: Some(access.to_string()),
            refresh_token: Some(refresh.to_string()),
            user: None,
        })
    }

    /// Store holding a complete session.
    #[must_use]
    pub fn with_session(access: &str, refresh: &str, user: UserSummary) -> Self {
        Self::from_snapshot(StoredCredentials {
            access_token: Some(access.to_string()),
            refresh_token: Some(refresh.to_string()),
            user: Some(user),
        })
    }

    fn from_snapshot(snapshot: StoredCredentials) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot)),
            access_failure: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoredCredentials> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later `access_token` read fail with `error`.
    pub fn fail_access_token_reads(&self, error: StoreError) {
        *self
            .access_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Current contents.
    #[must_use]
    pub fn snapshot(&self) -> StoredCredentials {
        self.lock().clone()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        let failure = self
            .access_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(self.lock().access_token.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().refresh_token.clone())
    }

    async fn user(&self) -> Result<Option<UserSummary>, StoreError> {
        Ok(self.lock().user.clone())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.lock().access_token = Some(token.to_string());
        Ok(())
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.lock().refresh_token = Some(token.to_string());
        Ok(())
    }

    async fn set_user(&self, user: &UserSummary) -> Result<(), StoreError> {
        self.lock().user = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = StoredCredentials::default();
        Ok(())
    }
}

/// Navigator that remembers every redirect.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Navigator with no redirects yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Routes redirected to, in order.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Most recent redirect.
    #[must_use]
    pub fn last_redirect(&self) -> Option<String> {
        self.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.lock().push(route.to_string());
    }
}
