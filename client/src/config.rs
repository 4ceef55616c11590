//! Client configuration.
//!
//! # Example
//!
//! ```rust
//! use eventhub_client::config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url("https://events.example.com/api/")
//!     .refresh_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.base_url, "https://events.example.com/api");
//! assert_eq!(config.login_route, "/login");
//! ```

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the API base URL (required by `from_env`).
pub const ENV_API_URL: &str = "EVENTHUB_API_URL";
/// Environment variable overriding the refresh deadline, in seconds.
pub const ENV_REFRESH_TIMEOUT_SECS: &str = "EVENTHUB_REFRESH_TIMEOUT_SECS";
/// Environment variable overriding the per-request transport deadline, in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "EVENTHUB_REQUEST_TIMEOUT_SECS";
/// Environment variable overriding the route used on forced logout.
pub const ENV_LOGIN_ROUTE: &str = "EVENTHUB_LOGIN_ROUTE";
/// Environment variable overriding the session file location.
pub const ENV_SESSION_FILE: &str = "EVENTHUB_SESSION_FILE";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOGIN_ROUTE: &str = "/login";
const DEFAULT_SESSION_FILE: &str = "eventhub-session.json";

/// Settings shared by the transport and the session manager.
///
/// # Default Values
///
/// - `base_url`: `http://localhost:8000/api`
/// - `refresh_timeout`: 30 seconds
/// - `request_timeout`: 30 seconds
/// - `login_route`: `/login`
/// - `session_file`: `eventhub-session.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Deadline for the token refresh call; elapsing it ends the session
    pub refresh_timeout: Duration,
    /// Deadline applied by the transport to each request
    pub request_timeout: Duration,
    /// Route handed to the navigator when the session cannot be recovered
    pub login_route: String,
    /// Where the file credential store keeps the session
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub const fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: None,
            refresh_timeout: None,
            request_timeout: None,
            login_route: None,
            session_file: None,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `EVENTHUB_API_URL` is not set, and
    /// `ConfigError::Invalid` for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_API_URL))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: ENV_API_URL,
                reason: "must start with http:// or https://".to_string(),
            });
        }

        let mut builder = Self::builder().base_url(base_url);
        if let Some(value) = lookup(ENV_REFRESH_TIMEOUT_SECS) {
            builder = builder.refresh_timeout(parse_seconds(ENV_REFRESH_TIMEOUT_SECS, &value)?);
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            builder = builder.request_timeout(parse_seconds(ENV_REQUEST_TIMEOUT_SECS, &value)?);
        }
        if let Some(route) = lookup(ENV_LOGIN_ROUTE).filter(|v| !v.trim().is_empty()) {
            builder = builder.login_route(route);
        }
        if let Some(path) = lookup(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
            builder = builder.session_file(path);
        }
        Ok(builder.build())
    }
}

fn parse_seconds(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let seconds = value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    refresh_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    login_route: Option<String>,
    session_file: Option<PathBuf>,
}

impl ClientConfigBuilder {
    /// Set the API base URL. A trailing slash is dropped.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the refresh deadline.
    #[must_use]
    pub const fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    /// Set the per-request transport deadline.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the route used on forced logout.
    #[must_use]
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = Some(route.into());
        self
    }

    /// Set the session file location.
    #[must_use]
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Build the [`ClientConfig`].
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self
                .base_url
                .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_string()),
            refresh_timeout: self.refresh_timeout.unwrap_or(defaults.refresh_timeout),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            login_route: self.login_route.unwrap_or(defaults.login_route),
            session_file: self.session_file.unwrap_or(defaults.session_file),
        }
    }
}
