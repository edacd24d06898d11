//! Error types for the task service

use thiserror::Error;

/// Result type alias for the task service
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the task service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors (malformed requests, business-rule rejections)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Optimistic-concurrency conflicts on single-record updates
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A bulk operation hit a fatal store error; the transaction was rolled back
    #[error("Bulk update failed, all changes were rolled back: {0}")]
    BulkRolledBack(#[source] Box<ServiceError>),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
