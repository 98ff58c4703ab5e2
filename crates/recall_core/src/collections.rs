//! crates/recall_core/src/collections.rs
//!
//! Typed access to the named JSON documents kept in a `DocumentStore`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ports::{DocumentStore, PortError, PortResult};

/// Names of the documents the service keeps.
pub mod keys {
    pub const USERS: &str = "recall_users";
    pub const CURRENT_USER: &str = "recall_current_user";
    pub const STUDY_SETS: &str = "recall_study_sets";
    pub const CURRENT_STUDY_SET: &str = "recall_current_study_set";
    pub const REVIEW_PROGRESS: &str = "recall_review_progress";
    pub const PREPARED_CHUNKS: &str = "recall_prepared_chunks";
    pub const EMBEDDINGS: &str = "recall_embeddings";
}

/// Reads and writes whole documents. There is no locking: a read-modify-write
/// cycle by two callers keeps whichever write lands last.
#[derive(Clone)]
pub struct Collections {
    store: Arc<dyn DocumentStore>,
}

impl Collections {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Decodes the document at `key`. A missing key is `Ok(None)`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> PortResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| PortError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Like `get`, but a missing document reads as an empty list.
    pub async fn list<T: DeserializeOwned>(&self, key: &str) -> PortResult<Vec<T>> {
        Ok(self.get(key).await?.unwrap_or_default())
    }

    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.store.put(key, raw).await
    }

    pub async fn remove(&self, key: &str) -> PortResult<()> {
        self.store.remove(key).await
    }

    pub async fn contains(&self, key: &str) -> PortResult<bool> {
        Ok(self.store.get(key).await?.is_some())
    }
}
