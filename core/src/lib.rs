//! # EventHub Core
//!
//! Domain types, request descriptors and environment traits shared by the
//! EventHub client crates.
//!
//! This crate holds no I/O of its own. Everything that touches the outside
//! world is expressed as a trait in [`environment`] and injected into the
//! session manager:
//!
//! - **Transport**: sends one [`HttpRequest`] and returns the raw [`HttpResponse`]
//! - **`CredentialStore`**: durable access/refresh tokens and the signed-in user
//! - **Navigator**: the "send the user back to the login view" hook
//! - **Clock**: current time, for expiry decisions
//!
//! ## Example
//!
//! ```
//! use eventhub_core::{HttpRequest, endpoints};
//!
//! let mut request = HttpRequest::get(endpoints::EVENTOS).with_query("page", 2);
//! request.set_bearer("access-token");
//!
//! assert_eq!(request.bearer(), Some("access-token"));
//! assert!(!request.targets_login());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use http::{HeaderMap, Method, StatusCode};

pub mod endpoints;
pub mod environment;
pub mod error;
pub mod model;
pub mod request;

pub use environment::{Clock, CredentialStore, Navigator, SystemClock, Transport};
pub use error::{RefreshFailure, StoreError, TransportError};
pub use model::{AuthTokens, Role, Session, UserSummary};
pub use request::{HttpRequest, HttpResponse};
