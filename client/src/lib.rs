//! # EventHub API Client
//!
//! Authenticated client for the EventHub backend. Every call goes through a
//! [`SessionManager`], which attaches the stored bearer token and recovers
//! from an expired access token with a single shared refresh: concurrent
//! requests rejected while a refresh runs are parked and replayed once with
//! the new token. An unrecoverable session is cleared and the injected
//! navigator is sent to the login route.
//!
//! ## Example
//!
//! ```no_run
//! use eventhub_client::{ClientConfig, FileCredentialStore, ReqwestTransport, SessionManager};
//! use eventhub_core::Navigator;
//!
//! struct Console;
//!
//! impl Navigator for Console {
//!     fn redirect(&self, route: &str) {
//!         eprintln!("session ended, go to {route}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let transport = ReqwestTransport::new(&config)?;
//!     let store = FileCredentialStore::new(&config.session_file);
//!     let session = SessionManager::new(transport, store, Console, config);
//!
//!     if session.restore_session().await?.is_none() {
//!         session.login("ana", "secret").await?;
//!     }
//!
//!     let eventos = session.events().list(1).await?;
//!     println!("{} events", eventos.count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Single-flight token refresh with ordered replay of parked requests
//! - Forced logout on refresh failure, refresh timeout or a repeated 401
//! - Typed services for events, subscriptions, notifications, participants
//!   and organizers
//! - File-backed credential store and a local notification feed

pub mod config;
pub mod error;
pub mod gate;
pub mod notifications;
pub mod services;
pub mod session;
pub mod store;
pub mod transport;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, Result};
pub use notifications::{FeedEntry, NotificationFeed, NotificationKind};
pub use session::{SessionManager, SessionState};
pub use store::FileCredentialStore;
pub use transport::ReqwestTransport;
