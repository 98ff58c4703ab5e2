//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and how it is assembled from the config.

use crate::adapters::{FileStore, SimulatedLatency, SystemClock};
use crate::config::Config;
use crate::error::ApiError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recall_core::fakes::{MemoryStore, NoLatency};
use recall_core::ports::{DocumentStore, Latency, StudyApi};
use recall_core::StudyService;
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn StudyApi>,
}

impl AppState {
    /// Wires the store, latency and random source the config asks for, then seeds
    /// the demo data.
    pub async fn from_config(config: &Config) -> Result<Self, ApiError> {
        let store: Arc<dyn DocumentStore> = match &config.store_path {
            Some(path) => {
                info!(path = %path.display(), "Using the JSON file store.");
                Arc::new(FileStore::open(path).await?)
            }
            None => {
                info!("Using the in-memory store; state is lost on restart.");
                Arc::new(MemoryStore::new())
            }
        };

        let latency: Arc<dyn Latency> = if config.simulate_latency {
            Arc::new(SimulatedLatency::scaled(config.latency_scale))
        } else {
            Arc::new(NoLatency)
        };

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let service = StudyService::new(store, Arc::new(SystemClock), latency, rng);
        service.seed().await?;

        Ok(Self {
            api: Arc::new(service),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::protocol::LoginRequest;
    use tempfile::TempDir;

    fn config_with(vars: &[(&'static str, String)]) -> Config {
        let vars = vars.to_vec();
        Config::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn file_backed_state_survives_a_rebuild() {
        let dir = TempDir::new().unwrap();
        let vars = [
            ("STORE_PATH", dir.path().display().to_string()),
            ("SIMULATE_LATENCY", "false".to_string()),
            ("RNG_SEED", "5".to_string()),
        ];

        let state = AppState::from_config(&config_with(&vars)).await.unwrap();
        assert!(dir.path().join("recall_users.json").exists());
        state
            .api
            .login(LoginRequest {
                email: "demo@recall.app".to_string(),
                password: "demo123".to_string(),
            })
            .await
            .unwrap();

        let rebuilt = AppState::from_config(&config_with(&vars)).await.unwrap();
        assert!(rebuilt.api.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn memory_state_starts_seeded() {
        let state = AppState::from_config(&config_with(&[(
            "SIMULATE_LATENCY",
            "false".to_string(),
        )]))
        .await
        .unwrap();
        assert_eq!(state.api.list_sets("u1").await.unwrap().sets.len(), 2);
    }
}
