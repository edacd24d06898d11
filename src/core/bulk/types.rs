//! Bulk-update result types

use serde::{Deserialize, Serialize};

use super::outcome::BulkOutcomeSnapshot;

/// Final accounting of a bulk status update
///
/// The four id lists partition the originally requested set: every requested
/// id appears in exactly one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateReport {
    /// Number of ids requested
    pub total_count: usize,
    /// Number of ids updated to the target status
    pub succeeded_count: usize,
    /// Number of ids that did not exist
    pub not_found_count: usize,
    /// Number of ids rejected by business rules
    pub invalid_count: usize,
    /// Number of ids still failed after retries
    pub failed_count: usize,
    /// Ids updated to the target status
    pub succeeded_ids: Vec<i32>,
    /// Ids that did not exist
    pub not_found_ids: Vec<i32>,
    /// Ids rejected by business rules
    pub invalid_ids: Vec<i32>,
    /// Ids still failed after retries
    pub failed_ids: Vec<i32>,
}

impl BulkUpdateReport {
    /// Build a report from the collector's final state
    pub fn from_outcome(total_count: usize, snapshot: BulkOutcomeSnapshot) -> Self {
        Self {
            total_count,
            succeeded_count: snapshot.succeeded.len(),
            not_found_count: snapshot.not_found.len(),
            invalid_count: snapshot.invalid.len(),
            failed_count: snapshot.failed.len(),
            succeeded_ids: snapshot.succeeded,
            not_found_ids: snapshot.not_found,
            invalid_ids: snapshot.invalid,
            failed_ids: snapshot.failed,
        }
    }
}
