//! Configuration sections for the task service

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of actix workers (0 = one per core)
    #[serde(default)]
    pub workers: usize,
    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            cors: CorsConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Whether CORS handling is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Allowed origins; `["*"]` allows any origin
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl CorsConfig {
    /// Whether the configuration allows any origin
    pub fn allows_all_origins(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (sqlite or postgres)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pool connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connect timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://data/taskflow.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connection_timeout() -> u64 {
    5
}

/// Task read-cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached tasks
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_capacity() -> u64 {
    10_000
}

/// Business-rule thresholds for priority tiers and the early-completion guard
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Tasks due within this many days are Urgent
    #[serde(default = "default_urgent_days")]
    pub urgent_days_limit: i64,
    /// Tasks due within this many days (but not urgent) are Normal
    #[serde(default = "default_normal_days")]
    pub normal_days_limit: i64,
    /// A task may not be completed more than this many days before it is due
    #[serde(default = "default_early_completion_days")]
    pub early_completion_days_limit: i64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            urgent_days_limit: default_urgent_days(),
            normal_days_limit: default_normal_days(),
            early_completion_days_limit: default_early_completion_days(),
        }
    }
}

fn default_urgent_days() -> i64 {
    1
}

fn default_normal_days() -> i64 {
    3
}

fn default_early_completion_days() -> i64 {
    3
}

/// Concurrent bulk-processing configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Requested ids per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Maximum batches in flight at once
    #[serde(default = "default_parallelism_degree")]
    pub parallelism_degree: usize,
    /// Retry rounds for rows that lost an optimistic-concurrency race
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between retry rounds, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            parallelism_degree: default_parallelism_degree(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_batch_size() -> usize {
    1000
}

fn default_parallelism_degree() -> usize {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
