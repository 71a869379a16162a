//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AFTERLIFE_TRIAGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use afterlife_triage::config::{init_tracing, TriageConfig};
//!
//! let config = TriageConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging).expect("Failed to initialise tracing");
//! ```

mod engine;
mod error;
mod logging;
mod storage;

pub use engine::{Environment, GraphConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

use crate::domain::triage::GraphIntegrityPolicy;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration. Load using [`TriageConfig::load()`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TriageConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Session persistence (memory or file)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Question graph behaviour
    #[serde(default)]
    pub graph: GraphConfig,
}

impl TriageConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AFTERLIFE_TRIAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AFTERLIFE_TRIAGE__STORAGE__BACKEND=memory` -> `storage.backend = memory`
    /// - `AFTERLIFE_TRIAGE__GRAPH__INTEGRITY_POLICY=strict` -> `graph.integrity_policy = strict`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AFTERLIFE_TRIAGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.logging.validate()?;
        self.graph.validate(self.environment)?;
        Ok(())
    }

    /// The graph integrity policy for this environment
    pub fn integrity_policy(&self) -> GraphIntegrityPolicy {
        self.graph.effective_policy(self.environment)
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "AFTERLIFE_TRIAGE__ENVIRONMENT",
        "AFTERLIFE_TRIAGE__STORAGE__BACKEND",
        "AFTERLIFE_TRIAGE__STORAGE__DATA_DIR",
        "AFTERLIFE_TRIAGE__LOGGING__LEVEL",
        "AFTERLIFE_TRIAGE__LOGGING__JSON",
        "AFTERLIFE_TRIAGE__GRAPH__INTEGRITY_POLICY",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = TriageConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AFTERLIFE_TRIAGE__STORAGE__BACKEND", "memory");
        env::set_var("AFTERLIFE_TRIAGE__STORAGE__DATA_DIR", "/var/lib/triage");
        env::set_var("AFTERLIFE_TRIAGE__LOGGING__LEVEL", "debug");
        env::set_var("AFTERLIFE_TRIAGE__LOGGING__JSON", "true");
        let result = TriageConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/triage"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_production_uses_fallback_policy() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AFTERLIFE_TRIAGE__ENVIRONMENT", "production");
        let result = TriageConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.integrity_policy(),
            GraphIntegrityPolicy::FallbackToComplete
        );
    }

    #[test]
    fn test_strict_override_in_production_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AFTERLIFE_TRIAGE__ENVIRONMENT", "production");
        env::set_var("AFTERLIFE_TRIAGE__GRAPH__INTEGRITY_POLICY", "strict");
        let result = TriageConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
