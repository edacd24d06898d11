//! # taskflow-rs
//!
//! A task management REST service built with actix-web and SeaORM.
//!
//! Task records (title, description, due time, status, derived priority) are
//! exposed over HTTP on top of a relational store with a cache-aside read
//! path. The centerpiece is the concurrent bulk status-update engine: given
//! a set of task ids and a target status it updates every eligible record
//! with one conditional write per batch, detects interference from
//! concurrent writers through a version token, retries the interfered-with
//! subset a bounded number of times, and returns an exact four-way
//! accounting (succeeded / not-found / invalid / failed) — all under bounded
//! parallelism inside a single transaction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskflow_rs::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     server::run_server().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::bulk::{BatchRunner, BulkOutcome, BulkUpdateEngine, BulkUpdateReport};
pub use core::tasks::{Task, TaskPriority, TaskStatus};
pub use services::TaskService;
pub use utils::error::{Result, ServiceError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
