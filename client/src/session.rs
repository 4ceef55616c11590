//! Authenticated session manager.
//!
//! [`SessionManager`] wraps every backend call with bearer-token attachment
//! and transparent recovery from access-token expiry:
//!
//! 1. The stored access token is attached to the request.
//! 2. A non-401 failure, or a 401 from the login endpoint, is returned as-is.
//! 3. A 401 on a request that was already replayed, or with no refresh token
//!    stored, ends the session (store cleared, navigator sent to login).
//! 4. Otherwise the request enters the [`RefreshGate`]: the first one refreshes
//!    the token, the rest wait for it, and all of them are replayed once with
//!    the new token.
//!
//! A refresh failure of any kind, including the configured deadline elapsing,
//! ends the session. The refresh call itself is never retried.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::gate::{Admission, RefreshGate, RefreshLease};
use eventhub_core::model::Registration;
use eventhub_core::{
    AuthTokens, CredentialStore, HttpRequest, HttpResponse, Navigator, RefreshFailure, Session,
    StatusCode, Transport, UserSummary, endpoints,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Where the session stands, as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// An access token is stored and no refresh is running.
    Valid,
    /// A refresh is running; rejected requests are parked.
    Refreshing,
    /// No credentials are stored. Only a login leaves this state.
    LoggedOut,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Deserialize)]
struct MeResponse {
    user: UserSummary,
}

#[derive(Deserialize)]
struct RegisteredUser {
    id: u64,
    username: String,
    #[serde(default)]
    participante_id: Option<u64>,
}

#[derive(Deserialize)]
struct RegisterResponse {
    access: String,
    refresh: String,
    user: RegisteredUser,
}

/// Authenticated API client.
///
/// Construct one per process and share it (for example behind an `Arc`).
/// All shared state lives here: the injected transport, credential store and
/// navigator, and the refresh gate.
///
/// # Type Parameters
///
/// - `T`: [`Transport`] used for every call, including the refresh
/// - `S`: [`CredentialStore`] holding the tokens and the user
/// - `N`: [`Navigator`] told to show the login view when the session ends
pub struct SessionManager<T, S, N> {
    transport: T,
    store: S,
    navigator: N,
    config: ClientConfig,
    gate: RefreshGate,
}

impl<T, S, N> SessionManager<T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    /// Create a session manager from its dependencies.
    pub const fn new(transport: T, store: S, navigator: N, config: ClientConfig) -> Self {
        Self {
            transport,
            store,
            navigator,
            config,
            gate: RefreshGate::new(),
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Injected credential store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current session state.
    ///
    /// # Errors
    ///
    /// Returns error if the credential store cannot be read.
    pub async fn state(&self) -> Result<SessionState> {
        if self.gate.is_in_flight() {
            return Ok(SessionState::Refreshing);
        }
        Ok(match self.store.access_token().await? {
            Some(_) => SessionState::Valid,
            None => SessionState::LoggedOut,
        })
    }

    /// Send `request` with the stored bearer token, recovering from an
    /// expired access token if possible.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for any non-2xx response that was not recovered
    /// - `ApiError::RefreshFailed` if the token refresh failed (session ended)
    /// - `ApiError::Transport` / `ApiError::Store` for lower-level failures
    pub async fn request(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        match self.store.access_token().await? {
            Some(token) => request.set_bearer(&token),
            None => request.clear_bearer(),
        }

        loop {
            let response = self.transport.send(request.clone()).await?;
            if response.is_success() {
                return Ok(response);
            }

            let token = self.recover(&request, &response).await?;
            request.retried = true;
            request.set_bearer(&token);
            debug!(method = %request.method, path = %request.path, "replaying request with refreshed token");
        }
    }

    /// Send `request` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::request`], plus `ApiError::Decode` for an
    /// unexpected body.
    pub async fn fetch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        Ok(self.request(request).await?.json()?)
    }

    /// Send `request` and discard the response body.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::request`].
    pub async fn execute(&self, request: HttpRequest) -> Result<()> {
        self.request(request).await.map(|_| ())
    }

    /// Decide what to do with a failed response. Returns the token to replay
    /// with, or the error to hand back to the caller.
    async fn recover(&self, request: &HttpRequest, response: &HttpResponse) -> Result<String> {
        if response.status != StatusCode::UNAUTHORIZED {
            return Err(ApiError::from_response(response));
        }

        if request.targets_login() {
            debug!("login rejected; not refreshing");
            return Err(ApiError::from_response(response));
        }

        if request.retried {
            self.end_session("replayed request rejected again").await;
            return Err(ApiError::from_response(response));
        }

        let Some(refresh_token) = self.store.refresh_token().await? else {
            self.end_session("no refresh token stored").await;
            return Err(ApiError::from_response(response));
        };

        loop {
            match self.gate.enter() {
                Admission::Follower(pending) => {
                    debug!(path = %request.path, "waiting for in-flight refresh");
                    match pending.wait().await {
                        // The refreshing caller was dropped; take over.
                        Err(RefreshFailure::Abandoned) => {
                            debug!(path = %request.path, "in-flight refresh abandoned");
                        }
                        outcome => return Ok(outcome?),
                    }
                }
                Admission::Leader(lease) => {
                    return Ok(self
                        .lead_refresh(lease, request.bearer(), &refresh_token)
                        .await?);
                }
            }
        }
    }

    async fn lead_refresh(
        &self,
        lease: RefreshLease<'_>,
        sent_with: Option<&str>,
        refresh_token: &str,
    ) -> std::result::Result<String, RefreshFailure> {
        let outcome = match self.store.access_token().await {
            // Another caller finished a refresh after this request was sent.
            Ok(Some(current)) if sent_with != Some(current.as_str()) => {
                debug!("access token already rotated; replaying without refresh");
                lease.resolve(current.clone());
                return Ok(current);
            }
            Ok(_) => {
                info!("access token rejected; refreshing");
                let timeout = self.config.refresh_timeout;
                tokio::time::timeout(timeout, self.call_refresh(refresh_token))
                    .await
                    .unwrap_or(Err(RefreshFailure::TimedOut(timeout)))
            }
            Err(error) => Err(RefreshFailure::Store(error)),
        };

        match outcome {
            Ok(token) => {
                let released = lease.resolve(token.clone());
                info!(released, "access token refreshed");
                Ok(token)
            }
            Err(failure) => {
                warn!(%failure, "token refresh failed");
                self.end_session("token refresh failed").await;
                let released = lease.reject(failure.clone());
                debug!(released, "rejected parked requests");
                Err(failure)
            }
        }
    }

    async fn call_refresh(&self, refresh_token: &str) -> std::result::Result<String, RefreshFailure> {
        let request = HttpRequest::post(endpoints::REFRESH).with_body(json!({ "refresh": refresh_token }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(RefreshFailure::Rejected {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        let body: RefreshResponse = response
            .json()
            .map_err(|_| RefreshFailure::MissingAccessToken)?;
        let access = body
            .access
            .filter(|token| !token.is_empty())
            .ok_or(RefreshFailure::MissingAccessToken)?;

        self.store.set_access_token(&access).await?;
        // Backends that rotate refresh tokens send the replacement along.
        if let Some(rotated) = body.refresh.filter(|token| !token.is_empty()) {
            self.store.set_refresh_token(&rotated).await?;
        }
        Ok(access)
    }

    async fn end_session(&self, reason: &'static str) {
        warn!(reason, route = %self.config.login_route, "ending session");
        if let Err(error) = self.store.clear().await {
            error!(%error, "failed to clear stored credentials");
        }
        self.navigator.redirect(&self.config.login_route);
    }

    /// Sign in with username and password.
    ///
    /// Stores both tokens, fetches the user profile from `/v1/auth/me/` and
    /// stores it. A 401 from the login endpoint is returned untouched. If
    /// the profile cannot be fetched the half-established session is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns the login or profile request error, or a store error.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = HttpRequest::post(endpoints::LOGIN).with_json(&LoginRequest { username, password })?;
        let tokens: AuthTokens = self.fetch(request).await?;

        self.store.set_access_token(&tokens.access).await?;
        self.store.set_refresh_token(&tokens.refresh).await?;

        let me = match self.fetch::<MeResponse>(HttpRequest::get(endpoints::ME)).await {
            Ok(me) => me,
            Err(err) => {
                warn!(%err, "signed in but the profile could not be loaded");
                self.store.clear().await?;
                return Err(err);
            }
        };
        self.store.set_user(&me.user).await?;

        // The profile call may have refreshed the access token already.
        let access_token = self.store.access_token().await?.unwrap_or(tokens.access);
        let refresh_token = self.store.refresh_token().await?.unwrap_or(tokens.refresh);
        info!(user_id = me.user.id, role = ?me.user.role, "signed in");
        Ok(Session {
            access_token,
            refresh_token,
            user: me.user,
        })
    }

    /// Create an account and sign in with the returned tokens.
    ///
    /// # Errors
    ///
    /// Returns the backend error (for example a 400 with field errors), or a
    /// store error.
    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        let request = HttpRequest::post(endpoints::REGISTER).with_json(registration)?;
        let body: RegisterResponse = self.fetch(request).await?;

        let user = UserSummary {
            id: body.user.id,
            username: body.user.username,
            email: registration.email.clone(),
            role: registration.role,
            participante_id: body.user.participante_id,
        };
        self.store.set_access_token(&body.access).await?;
        self.store.set_refresh_token(&body.refresh).await?;
        self.store.set_user(&user).await?;

        info!(user_id = user.id, role = ?user.role, "registered and signed in");
        Ok(Session {
            access_token: body.access,
            refresh_token: body.refresh,
            user,
        })
    }

    /// Sign out: remove every stored session key.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        info!("signed out");
        Ok(())
    }

    /// The stored session, if access token, refresh token and user are all
    /// present.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        let access_token = self.store.access_token().await?;
        let refresh_token = self.store.refresh_token().await?;
        let user = self.store.user().await?;

        Ok(match (access_token, refresh_token, user) {
            (Some(access_token), Some(refresh_token), Some(user)) => Some(Session {
                access_token,
                refresh_token,
                user,
            }),
            _ => None,
        })
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub async fn current_user(&self) -> Result<Option<UserSummary>> {
        Ok(self.store.user().await?)
    }

    /// Whether the signed-in user is an organizer.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub async fn is_organizer(&self) -> Result<bool> {
        Ok(self
            .current_user()
            .await?
            .is_some_and(|user| user.is_organizer()))
    }
}
