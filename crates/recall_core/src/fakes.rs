//! crates/recall_core/src/fakes.rs
//!
//! In-process implementations of the infrastructure ports. `MemoryStore` doubles
//! as the production store when no storage directory is configured; the clock and
//! latency fakes make the service deterministic under test.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::ports::{Clock, DocumentStore, Latency, Operation, PortResult};

/// A volatile document store backed by a `HashMap`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> PortResult<()> {
        self.documents.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}

/// A clock stuck at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Answers immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _operation: Operation) {}
}
