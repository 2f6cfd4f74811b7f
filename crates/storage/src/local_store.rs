//! Typed JSON access on top of a [`KeyValueBackend`].
//!
//! Every operation degrades instead of failing: reads return `None`, writes
//! return `false`, removals become no-ops. Errors are logged, not raised.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{KeyValueBackend, Storage};

/// Key of the active practice session record.
pub const SESSION_DATA_KEY: &str = "interview_practice_session";
/// Key of the remembered authenticated user.
pub const AUTH_USER_KEY: &str = "interview_practice_auth";
/// Key of the user's display preferences.
pub const USER_PREFERENCES_KEY: &str = "interview_practice_preferences";

const PROBE_KEY: &str = "__localStorage_test__";

/// One logical store per running process; clones share the same backend.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl LocalStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.backend))
    }

    /// Probe the backend with a harmless write/delete cycle.
    pub async fn is_available(&self) -> bool {
        if let Err(err) = self.backend.set_item(PROBE_KEY, PROBE_KEY).await {
            tracing::debug!(error = %err, "local store probe write failed");
            return false;
        }
        match self.backend.remove_item(PROBE_KEY).await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "local store probe delete failed");
                false
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// Returns whether the write succeeded.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        if !self.is_available().await {
            return false;
        }
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(key, error = %err, "local store serialize failed");
                return false;
            }
        };
        match self.backend.set_item(key, &text).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(key, error = %err, "local store set failed");
                false
            }
        }
    }

    /// Read and decode the value under `key`.
    ///
    /// `None` if the key is missing, the backend is unavailable, or the stored
    /// text does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.is_available().await {
            return None;
        }
        let text = match self.backend.get_item(key).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return None,
            Err(err) => {
                tracing::error!(key, error = %err, "local store get failed");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(key, error = %err, "local store value is corrupt");
                None
            }
        }
    }

    /// Delete `key` if present.
    pub async fn remove(&self, key: &str) {
        if !self.is_available().await {
            return;
        }
        if let Err(err) = self.backend.remove_item(key).await {
            tracing::error!(key, error = %err, "local store remove failed");
        }
    }

    /// Wipe the entire namespace, including keys this app did not write.
    pub async fn clear(&self) {
        if !self.is_available().await {
            return;
        }
        if let Err(err) = self.backend.clear().await {
            tracing::error!(error = %err, "local store clear failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryBackend;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        dark: bool,
        size: u8,
    }

    fn store_with(backend: &InMemoryBackend) -> LocalStore {
        LocalStore::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn typed_round_trip() {
        let backend = InMemoryBackend::new();
        let store = store_with(&backend);
        let prefs = Prefs { dark: true, size: 3 };

        assert!(store.set("prefs", &prefs).await);
        assert_eq!(store.get::<Prefs>("prefs").await, Some(prefs));
        // the probe key never lingers
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_absent() {
        let backend = InMemoryBackend::new();
        backend.set_item("prefs", "{not json").await.unwrap();
        let store = store_with(&backend);

        assert_eq!(store.get::<Prefs>("prefs").await, None);
        assert_eq!(store.get::<Prefs>("missing").await, None);
    }

    #[tokio::test]
    async fn unavailable_backend_degrades() {
        let backend = InMemoryBackend::unavailable();
        let store = store_with(&backend);

        assert!(!store.is_available().await);
        assert!(!store.set("prefs", &Prefs { dark: false, size: 1 }).await);
        assert_eq!(store.get::<Prefs>("prefs").await, None);
        store.remove("prefs").await;
        store.clear().await;
    }

    #[tokio::test]
    async fn clear_wipes_unrelated_keys() {
        let backend = InMemoryBackend::new();
        backend.set_item("someone_else", "1").await.unwrap();
        let store = store_with(&backend);
        assert!(store.set(SESSION_DATA_KEY, &1_u8).await);

        store.clear().await;
        assert!(backend.is_empty());
    }
}
