//! Error types raised by the injected environment.

use std::time::Duration;
use thiserror::Error;

/// Failures below the HTTP layer: the request never produced a status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The transport's own deadline elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The request descriptor could not be turned into a wire request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport failure.
    #[error("Request failed: {0}")]
    Request(String),
}

/// Credential persistence failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("Credential storage I/O failed: {0}")]
    Io(String),

    /// A stored value exists but cannot be decoded.
    #[error("Stored credential data is corrupt: {0}")]
    Corrupt(String),
}

/// Why a token refresh did not produce a new access token.
///
/// `Clone` because the same failure is handed to every request that was
/// parked behind the refresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The refresh endpoint answered with a non-2xx status.
    #[error("Refresh rejected (status {status})")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },

    /// The refresh endpoint answered 2xx without an `access` field.
    #[error("Refresh response carried no access token")]
    MissingAccessToken,

    /// The refresh endpoint did not answer within the configured deadline.
    #[error("Refresh timed out after {0:?}")]
    TimedOut(Duration),

    /// The refresh request failed below HTTP.
    #[error("Refresh transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The new access token could not be persisted.
    #[error("Refresh could not persist the new token: {0}")]
    Store(#[from] StoreError),

    /// The task driving the refresh was dropped before it finished. Waiting
    /// requests take the refresh over instead of failing with this.
    #[error("Refresh was abandoned before completion")]
    Abandoned,
}
