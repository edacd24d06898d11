//! Error handling for the task service
//!
//! This module provides the unified error type, the `Result` alias used
//! throughout the crate, and the HTTP response mapping.

pub mod response;
pub mod types;

pub use types::{Result, ServiceError};
