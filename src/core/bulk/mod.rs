//! Concurrent bulk status-update machinery
//!
//! The [`BulkUpdateEngine`] owns the business semantics (snapshot, one
//! conditional write per batch, outcome classification, bounded retry); the
//! [`BatchRunner`] owns the mechanism (chunking, bounded parallelism, one
//! transaction around the whole run). Workers share a [`BulkOutcome`].

pub mod engine;
pub mod outcome;
pub mod runner;
pub mod types;


pub use engine::BulkUpdateEngine;
pub use outcome::{BulkOutcome, BulkOutcomeSnapshot};
pub use runner::BatchRunner;
pub use types::BulkUpdateReport;
