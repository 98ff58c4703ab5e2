//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Directory of the JSON file store. `None` keeps everything in memory.
    pub store_path: Option<PathBuf>,
    /// Whether operations sleep to imitate network round trips.
    pub simulate_latency: bool,
    /// Multiplier applied to every simulated delay.
    pub latency_scale: f64,
    /// Fixed seed for generated difficulties, embeddings and streaks.
    pub rng_seed: Option<u64>,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Storage and Simulation Settings ---
        let store_path = lookup("STORE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let simulate_latency = match lookup("SIMULATE_LATENCY") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("SIMULATE_LATENCY".to_string(), raw))?,
            None => true,
        };

        let latency_scale = match lookup("LATENCY_SCALE") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale >= 0.0 => scale,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "LATENCY_SCALE".to_string(),
                        format!("'{}' is not a non-negative number", raw),
                    ))
                }
            },
            None => 1.0,
        };

        let rng_seed = lookup("RNG_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue("RNG_SEED".to_string(), e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            bind_address,
            log_level,
            store_path,
            simulate_latency,
            latency_scale,
            rng_seed,
            cors_origin,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.store_path.is_none());
        assert!(config.simulate_latency);
        assert!(config.rng_seed.is_none());
        assert_eq!(config.latency_scale, 1.0);
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = load(&[
            ("STORE_PATH", "/tmp/recall"),
            ("SIMULATE_LATENCY", "off"),
            ("RNG_SEED", "99"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/recall")));
        assert!(!config.simulate_latency);
        assert_eq!(config.rng_seed, Some(99));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("SIMULATE_LATENCY", "sometimes")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "SIMULATE_LATENCY"));

        let err = load(&[("RNG_SEED", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "RNG_SEED"));

        let err = load(&[("LATENCY_SCALE", "-2")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "LATENCY_SCALE"));

        let err = load(&[("BIND_ADDRESS", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "BIND_ADDRESS"));
    }
}
