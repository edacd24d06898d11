//! Configuration management for the task service
//!
//! This module handles loading, validation, and management of all service
//! configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, ServiceError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the task service
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Task read-cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Business-rule thresholds
    #[serde(default)]
    pub rules: RulesConfig,
    /// Concurrent bulk-processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;

        let config = config.apply_env_overrides();
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build a configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config::default().apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-variable overrides on top of the loaded values
    fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(host) = std::env::var("TASKFLOW_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TASKFLOW_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| ServiceError::Config(format!("Server config error: {}", e)))?;
        self.database
            .validate()
            .map_err(|e| ServiceError::Config(format!("Database config error: {}", e)))?;
        self.cache
            .validate()
            .map_err(|e| ServiceError::Config(format!("Cache config error: {}", e)))?;
        self.rules
            .validate()
            .map_err(|e| ServiceError::Config(format!("Rules config error: {}", e)))?;
        self.processing
            .validate()
            .map_err(|e| ServiceError::Config(format!("Processing config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }
}
