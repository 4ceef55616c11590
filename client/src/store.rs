//! File-backed [`CredentialStore`].
//!
//! The session lives in a small JSON object with one string value per key,
//! mirroring browser local storage:
//!
//! ```json
//! { "auth_token": "...", "refresh_token": "...", "auth_user": "{\"id\":1,...}" }
//! ```
//!
//! The file is read once and cached; every write replaces the file through a
//! temporary sibling so a crash never leaves half a session behind.

use eventhub_core::{CredentialStore, StoreError, UserSummary};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "auth_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key of the serialized user.
pub const USER_KEY: &str = "auth_user";

type Entries = BTreeMap<String, String>;

/// Credential store persisted to a JSON file.
///
/// Cloning shares the same cache and file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    cache: Arc<Mutex<Option<Entries>>>,
}

impl FileCredentialStore {
    /// Store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<Entries, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn write_file(&self, entries: &Entries) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Io(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        Ok(cache
            .as_ref()
            .and_then(|entries| entries.get(key))
            .filter(|value| !value.trim().is_empty())
            .cloned())
    }

    async fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let mut cache = self.cache.lock().await;
        let mut entries = match cache.take() {
            Some(entries) => entries,
            None => self.read_file().await?,
        };
        apply(&mut entries);
        // On failure the cache stays empty so the next access re-reads disk.
        self.write_file(&entries).await?;
        *cache = Some(entries);
        Ok(())
    }

    async fn set(&self, key: &'static str, value: String) -> Result<(), StoreError> {
        self.update(move |entries| {
            entries.insert(key.to_string(), value);
        })
        .await
    }
}

impl CredentialStore for FileCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.get(REFRESH_TOKEN_KEY).await
    }

    async fn user(&self) -> Result<Option<UserSummary>, StoreError> {
        self.get(USER_KEY)
            .await?
            .map(|raw| serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string())))
            .transpose()
    }

    async fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.set(ACCESS_TOKEN_KEY, token.to_string()).await
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.set(REFRESH_TOKEN_KEY, token.to_string()).await
    }

    async fn set_user(&self, user: &UserSummary) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user).map_err(|e| StoreError::Io(e.to_string()))?;
        self.set(USER_KEY, raw).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        debug!(path = %self.path.display(), "clearing stored session");
        self.update(|entries| {
            for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
                entries.remove(key);
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use eventhub_core::Role;

    fn ana() -> UserSummary {
        UserSummary {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Participante,
            participante_id: Some(10),
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileCredentialStore::new(&path);
        store.set_access_token("access").await.unwrap();
        store.set_refresh_token("refresh").await.unwrap();
        store.set_user(&ana()).await.unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.access_token().await.unwrap().as_deref(), Some("access"));
        assert_eq!(reopened.refresh_token().await.unwrap().as_deref(), Some("refresh"));
        assert_eq!(reopened.user().await.unwrap(), Some(ana()));

        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.contains_key(USER_KEY));
    }

    #[tokio::test]
    async fn clear_removes_every_session_key_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark","auth_token":"a","refresh_token":"r"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.clear().await.unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.access_token().await.unwrap(), None);
        assert_eq!(reopened.refresh_token().await.unwrap(), None);
        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("theme").map(String::as_str), Some("dark"));
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_matching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(&path);
        store.set_access_token("access").await.unwrap();
        store.set_refresh_token("refresh").await.unwrap();

        // A directory where the temporary file goes makes every write fail.
        std::fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(matches!(store.clear().await, Err(StoreError::Io(_))));
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access"));
        assert!(store.set_access_token("other").await.is_err());
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access"));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(
            store.access_token().await,
            Err(StoreError::Corrupt(_))
        ));
    }
}
