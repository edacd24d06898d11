//! Configuration validation

use super::models::{CacheConfig, DatabaseConfig, ProcessingConfig, RulesConfig, ServerConfig};

/// Validation for configuration sections
pub trait Validate {
    /// Check the section for inconsistent or unusable values
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("server host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("server port must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("database url must not be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("database max_connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("cache ttl_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for RulesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.urgent_days_limit < 0 || self.normal_days_limit < 0 {
            return Err("priority day limits must not be negative".to_string());
        }
        if self.urgent_days_limit > self.normal_days_limit {
            return Err("urgent_days_limit must not exceed normal_days_limit".to_string());
        }
        if self.early_completion_days_limit < 0 {
            return Err("early_completion_days_limit must not be negative".to_string());
        }
        Ok(())
    }
}

impl Validate for ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("processing batch_size must be greater than 0".to_string());
        }
        if self.parallelism_degree == 0 {
            return Err("processing parallelism_degree must be greater than 0".to_string());
        }
        Ok(())
    }
}
