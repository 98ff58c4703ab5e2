//! services/api/src/adapters/file_store.rs
//!
//! A `DocumentStore` that keeps each document in its own `<key>.json` file under
//! one directory, so state survives restarts of the service.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use recall_core::ports::{DocumentStore, PortError, PortResult};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> PortResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| PortError::Unexpected(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PortError::Unexpected(format!("Invalid document key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!("{}: {}", path.display(), e))),
        }
    }

    async fn put(&self, key: &str, value: String) -> PortResult<()> {
        let path = self.path_for(key)?;
        let root = self.root.clone();
        let target = path.clone();

        // Every write stages in its own uniquely named file beside the target and
        // renames it into place, so concurrent writers never share a staging file.
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = NamedTempFile::new_in(&root)?;
            staging.write_all(value.as_bytes())?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| PortError::Unexpected(format!("Write of '{key}' did not finish: {e}")))?
        .map_err(|e| PortError::Unexpected(format!("{}: {}", path.display(), e)))?;

        debug!(key, "Document written.");
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!("{}: {}", path.display(), e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn documents_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert_eq!(store.get("recall_users").await.unwrap(), None);
        store.put("recall_users", "[1,2]".to_string()).await.unwrap();
        assert_eq!(store.get("recall_users").await.unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("recall_users.json").exists());

        // A second handle over the same directory sees the same data.
        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("recall_users").await.unwrap().as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn removing_twice_is_fine() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.put("recall_current_user", "{}".to_string()).await.unwrap();
        store.remove("recall_current_user").await.unwrap();
        store.remove("recall_current_user").await.unwrap();
        assert_eq!(store.get("recall_current_user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_cannot_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.get("../etc/passwd").await.is_err());
        assert!(store.put("", "x".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn open_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).await.unwrap();
        assert!(nested.is_dir());

        store.put("recall_users", "[]".to_string()).await.unwrap();
        assert!(nested.join("recall_users.json").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_leave_one_whole_document() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let documents: Vec<String> = (0..16)
            .map(|i| format!("[{}]", vec![i.to_string(); 20_000].join(",")))
            .collect();

        let writers: Vec<_> = documents
            .iter()
            .cloned()
            .map(|doc| {
                let store = store.clone();
                tokio::spawn(async move { store.put("recall_embeddings", doc).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let stored = store.get("recall_embeddings").await.unwrap().unwrap();
        assert!(documents.contains(&stored));

        // No staging files are left behind.
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["recall_embeddings.json".to_string()]);
    }
}
