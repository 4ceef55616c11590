//! Client-side notification feed.
//!
//! The UI shows one list mixing backend [`Notificacao`] records with short
//! lived notices produced locally (a subscription confirmed, a request
//! failed). Local notices expire after a day and are persisted to a JSON file
//! between runs.

use chrono::{DateTime, TimeDelta, Utc};
use eventhub_core::model::Notificacao;
use eventhub_core::{Clock, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Lifetime of a local notification.
pub const LOCAL_TTL_HOURS: i64 = 24;

/// Prefix of the feed key of a backend notification.
pub const BACKEND_KEY_PREFIX: &str = "api-";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something succeeded
    Sucesso,
    /// Something failed
    Erro,
    /// Needs attention
    Aviso,
    /// Informational
    Info,
}

/// A notification produced on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    /// Feed key
    pub id: String,
    /// Severity
    pub kind: NotificationKind,
    /// Message text
    pub message: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Read flag
    pub is_read: bool,
}

/// Origin of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// Produced locally
    Local,
    /// Returned by `/v1/notificacoes/`
    Backend,
}

/// One row of the merged feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Unique key; `api-<id>` for backend entries
    pub key: String,
    /// Origin
    pub source: FeedSource,
    /// Severity; backend entries are [`NotificationKind::Info`]
    pub kind: NotificationKind,
    /// Message text
    pub message: String,
    /// Related event title (backend entries only)
    pub evento_titulo: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Read flag
    pub is_read: bool,
}

impl From<&Notificacao> for FeedEntry {
    fn from(notificacao: &Notificacao) -> Self {
        Self {
            key: format!("{BACKEND_KEY_PREFIX}{}", notificacao.id),
            source: FeedSource::Backend,
            kind: NotificationKind::Info,
            message: notificacao.mensagem.clone(),
            evento_titulo: Some(notificacao.evento_titulo.clone())
                .filter(|titulo| !titulo.is_empty()),
            created_at: notificacao.created_at,
            is_read: notificacao.is_read,
        }
    }
}

impl From<&LocalNotification> for FeedEntry {
    fn from(local: &LocalNotification) -> Self {
        Self {
            key: local.id.clone(),
            source: FeedSource::Local,
            kind: local.kind,
            message: local.message.clone(),
            evento_titulo: None,
            created_at: local.created_at,
            is_read: local.is_read,
        }
    }
}

/// Local notifications plus the merge with backend ones.
///
/// Expired local entries are pruned on every read and before saving.
#[derive(Debug)]
pub struct NotificationFeed<C> {
    clock: C,
    ttl: TimeDelta,
    local: Vec<LocalNotification>,
    sequence: u64,
}

impl<C: Clock> NotificationFeed<C> {
    /// Empty feed.
    pub fn new(clock: C) -> Self {
        Self::with_entries(clock, Vec::new())
    }

    fn with_entries(clock: C, local: Vec<LocalNotification>) -> Self {
        let sequence = local.len() as u64;
        Self {
            clock,
            ttl: TimeDelta::hours(LOCAL_TTL_HOURS),
            local,
            sequence,
        }
    }

    /// Add a local notification and return its key.
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> String {
        let created_at = self.clock.now();
        self.sequence += 1;
        let id = format!("local-{}-{}", created_at.timestamp_millis(), self.sequence);
        self.local.push(LocalNotification {
            id: id.clone(),
            kind,
            message: message.into(),
            created_at,
            is_read: false,
        });
        id
    }

    /// Drop local notifications older than the TTL. Returns how many went.
    pub fn prune_expired(&mut self) -> usize {
        let cutoff = self.clock.now() - self.ttl;
        let before = self.local.len();
        self.local.retain(|entry| entry.created_at > cutoff);
        let pruned = before - self.local.len();
        if pruned > 0 {
            debug!(pruned, "expired local notifications removed");
        }
        pruned
    }

    /// Live local notifications, oldest first.
    pub fn local(&mut self) -> &[LocalNotification] {
        self.prune_expired();
        &self.local
    }

    /// Mark a local notification as read. Returns `false` for an unknown key.
    ///
    /// Backend notifications are marked through
    /// [`Notificacoes::mark_read`](crate::services::Notificacoes::mark_read).
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.local.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_read = true;
                true
            }
            None => false,
        }
    }

    /// One list of backend and local notifications, newest first.
    ///
    /// Keys are unique. A local notification repeating a backend message is
    /// hidden behind the backend one.
    pub fn merged(&mut self, backend: &[Notificacao]) -> Vec<FeedEntry> {
        self.prune_expired();

        let mut keys = HashSet::new();
        let mut entries: Vec<FeedEntry> = backend
            .iter()
            .map(FeedEntry::from)
            .filter(|entry| keys.insert(entry.key.clone()))
            .collect();
        let backend_messages: HashSet<&str> =
            backend.iter().map(|n| n.mensagem.as_str()).collect();

        entries.extend(
            self.local
                .iter()
                .filter(|local| !backend_messages.contains(local.message.as_str()))
                .filter(|local| keys.insert(local.id.clone()))
                .map(FeedEntry::from),
        );

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Unread entries in the merged feed.
    pub fn unread_count(&mut self, backend: &[Notificacao]) -> usize {
        self.merged(backend)
            .iter()
            .filter(|entry| !entry.is_read)
            .count()
    }

    /// Write the live local notifications to `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be written.
    pub async fn save(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        self.prune_expired();
        let bytes =
            serde_json::to_vec_pretty(&self.local).map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Read a feed saved by [`NotificationFeed::save`]. A missing file yields
    /// an empty feed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` for unreadable JSON and `StoreError::Io`
    /// for other I/O failures.
    pub async fn load(clock: C, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let local = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        let mut feed = Self::with_entries(clock, local);
        feed.prune_expired();
        Ok(feed)
    }
}
