//! Concurrency-safe accumulator for bulk-update outcomes
//!
//! Four disjoint identifier sets built incrementally by concurrent batch
//! workers. The terminal categories (succeeded, not-found, invalid) are
//! append-only; `failed` is transient and cleared when a retried id lands in
//! a terminal category. Lifetime is exactly one bulk-update call.

use dashmap::DashSet;

/// Shared outcome collector for one bulk-update operation
#[derive(Debug, Default)]
pub struct BulkOutcome {
    succeeded: DashSet<i32>,
    not_found: DashSet<i32>,
    invalid: DashSet<i32>,
    failed: DashSet<i32>,
}

impl BulkOutcome {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The write touched the row and it landed on the target status
    pub fn record_succeeded(&self, id: i32) {
        self.failed.remove(&id);
        self.succeeded.insert(id);
    }

    /// The id did not exist at snapshot time; never retried
    pub fn record_not_found(&self, id: i32) {
        self.failed.remove(&id);
        self.not_found.insert(id);
    }

    /// A business rule rejected the row with no concurrent writer involved
    pub fn record_invalid(&self, id: i32) {
        self.failed.remove(&id);
        self.invalid.insert(id);
    }

    /// The row lost an optimistic-concurrency race this round
    pub fn record_failed(&self, id: i32) {
        self.failed.insert(id);
    }

    /// Number of ids currently marked failed
    pub fn failed_len(&self) -> usize {
        self.failed.len()
    }

    /// Sorted copies of the four sets
    pub fn snapshot(&self) -> BulkOutcomeSnapshot {
        let collect_sorted = |set: &DashSet<i32>| {
            let mut ids: Vec<i32> = set.iter().map(|id| *id).collect();
            ids.sort_unstable();
            ids
        };

        BulkOutcomeSnapshot {
            succeeded: collect_sorted(&self.succeeded),
            not_found: collect_sorted(&self.not_found),
            invalid: collect_sorted(&self.invalid),
            failed: collect_sorted(&self.failed),
        }
    }
}

/// Point-in-time copy of the collector's four sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcomeSnapshot {
    /// Ids that reached the target status
    pub succeeded: Vec<i32>,
    /// Ids that did not exist
    pub not_found: Vec<i32>,
    /// Ids rejected by a business rule
    pub invalid: Vec<i32>,
    /// Ids still failed after retries
    pub failed: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn terminal_categories_clear_the_failed_state() {
        let outcome = BulkOutcome::new();

        outcome.record_failed(1);
        outcome.record_failed(2);
        outcome.record_failed(3);
        assert_eq!(outcome.failed_len(), 3);

        outcome.record_succeeded(1);
        outcome.record_invalid(2);
        outcome.record_not_found(3);

        let snapshot = outcome.snapshot();
        assert_eq!(snapshot.succeeded, vec![1]);
        assert_eq!(snapshot.invalid, vec![2]);
        assert_eq!(snapshot.not_found, vec![3]);
        assert!(snapshot.failed.is_empty());
    }

    #[test]
    fn repeated_inserts_do_not_duplicate() {
        let outcome = BulkOutcome::new();
        outcome.record_succeeded(5);
        outcome.record_succeeded(5);

        assert_eq!(outcome.snapshot().succeeded, vec![5]);
    }

    #[tokio::test]
    async fn concurrent_workers_lose_no_updates() {
        let outcome = Arc::new(BulkOutcome::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let outcome = Arc::clone(&outcome);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    let id = worker * 100 + i;
                    match id % 4 {
                        0 => outcome.record_succeeded(id),
                        1 => outcome.record_not_found(id),
                        2 => outcome.record_invalid(id),
                        _ => outcome.record_failed(id),
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.expect("worker panicked");
        }

        let snapshot = outcome.snapshot();
        assert_eq!(snapshot.succeeded.len(), 200);
        assert_eq!(snapshot.not_found.len(), 200);
        assert_eq!(snapshot.invalid.len(), 200);
        assert_eq!(snapshot.failed.len(), 200);
    }
}
