//! Error types for the EventHub API client

use eventhub_core::{HttpResponse, RefreshFailure, StatusCode, StoreError, TransportError};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned to callers of the session manager and the services.
///
/// Recoverable auth failures never surface here: a 401 that a refresh fixes
/// is invisible to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status that was not recovered.
    ///
    /// Covers ordinary failures, a 401 from the login endpoint, and the 401
    /// that ended the session (second rejection or no refresh token).
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: StatusCode,
        /// Response body as text
        body: String,
    },

    /// The access token could not be refreshed; the session has ended.
    #[error("Session expired: {0}")]
    RefreshFailed(#[from] RefreshFailure),

    /// No HTTP response was obtained.
    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

    /// Reading or writing the credential store failed.
    #[error("Credential storage failed: {0}")]
    Store(#[from] StoreError),

    /// A response body or request payload did not match the expected shape.
    #[error("Response parsing failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Error for a non-2xx response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::Status {
            status: response.status,
            body: response.text(),
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller was rejected for authentication reasons, either
    /// directly (401) or because the refresh failed.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Errors raised while building the client configuration or transport.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// A setting has an unusable value.
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Setting name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
