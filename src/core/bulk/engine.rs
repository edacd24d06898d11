//! Bulk status-update engine
//!
//! Per round: snapshot `(id, version)` for the requested ids, classify the
//! missing ones as not-found, issue one conditional write (token match AND
//! transition-policy filter), re-fetch, and classify every snapshot-present
//! row by comparing its post-write state to the snapshot. Rows that lost the
//! token race are retried after a fixed delay, up to `max_retries` rounds.
//! Row-level outcomes are recorded in the shared collector and never thrown;
//! only store errors propagate (and abort the surrounding transaction).

use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::core::tasks::policy::TransitionPolicy;
use crate::core::tasks::priority::PriorityClassifier;
use crate::core::tasks::types::TaskStatus;
use crate::storage::database::task_ops;
use crate::storage::database::{TaskRowState, TaskVersionSnapshot};
use crate::utils::error::Result;

use super::outcome::BulkOutcome;

/// Applies a status change to a batch of task ids with bounded retries
#[derive(Clone)]
pub struct BulkUpdateEngine {
    policy: Arc<TransitionPolicy>,
    classifier: Arc<PriorityClassifier>,
    max_retries: u32,
    retry_delay: Duration,
}

impl BulkUpdateEngine {
    /// Create an engine from the shared rule objects and processing settings
    pub fn new(
        policy: Arc<TransitionPolicy>,
        classifier: Arc<PriorityClassifier>,
        processing: &ProcessingConfig,
    ) -> Self {
        Self {
            policy,
            classifier,
            max_retries: processing.max_retries,
            retry_delay: Duration::from_millis(processing.retry_delay_ms),
        }
    }

    /// Process one batch of requested ids to completion, retries included
    ///
    /// Every requested id ends in exactly one collector category. `max_retries`
    /// counts retry rounds after the initial one, so `max_retries = 0` means a
    /// single round.
    pub async fn process<C: ConnectionTrait>(
        &self,
        conn: &C,
        outcome: &BulkOutcome,
        requested_ids: Vec<i32>,
        to_status: TaskStatus,
    ) -> Result<()> {
        let mut pending = requested_ids;
        let mut round = 0u32;

        loop {
            let now = Utc::now();
            let snapshot = task_ops::fetch_version_snapshot(conn, &pending).await?;
            let failed = self
                .execute_round(conn, outcome, &pending, snapshot, to_status, now)
                .await?;

            if failed.is_empty() || round >= self.max_retries {
                break;
            }

            round += 1;
            debug!(
                round,
                failed = failed.len(),
                "Retrying rows that lost the version-token race"
            );
            tokio::time::sleep(self.retry_delay).await;
            pending = failed;
        }

        Ok(())
    }

    /// One snapshot → conditional write → re-fetch → classify round
    ///
    /// Returns the ids that failed this round.
    async fn execute_round<C: ConnectionTrait>(
        &self,
        conn: &C,
        outcome: &BulkOutcome,
        requested_ids: &[i32],
        snapshot: Vec<TaskVersionSnapshot>,
        to_status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<Vec<i32>> {
        // Requested ids absent from the snapshot do not exist; terminal.
        let found: HashSet<i32> = snapshot.iter().map(|entry| entry.id).collect();
        for id in requested_ids {
            if !found.contains(id) {
                outcome.record_not_found(*id);
            }
        }
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }

        task_ops::conditional_status_update(
            conn,
            &snapshot,
            to_status,
            &self.policy,
            &self.classifier,
            now,
        )
        .await?;

        let found_ids: Vec<i32> = snapshot.iter().map(|entry| entry.id).collect();
        let states = task_ops::fetch_row_states(conn, &found_ids).await?;

        Ok(classify_round(
            &snapshot, &states, to_status, &self.policy, now, outcome,
        ))
    }
}

/// Classify every snapshot-present row after a conditional write
///
/// - unaffected (token unchanged) + policy rejects → invalid
/// - unaffected + policy passes → failed (lost the token race)
/// - touched + on the target status → succeeded
/// - touched + NOT on the target status → failed (another writer interleaved)
///
/// Returns the failed ids, which are this round's retry subset.
fn classify_round(
    snapshot: &[TaskVersionSnapshot],
    states: &[TaskRowState],
    to_status: TaskStatus,
    policy: &TransitionPolicy,
    now: DateTime<Utc>,
    outcome: &BulkOutcome,
) -> Vec<i32> {
    let after: HashMap<i32, &TaskRowState> = states.iter().map(|row| (row.id, row)).collect();
    let mut failed = Vec::new();

    for entry in snapshot {
        let Some(row) = after.get(&entry.id) else {
            // Deleted between snapshot and re-fetch; terminal.
            outcome.record_not_found(entry.id);
            continue;
        };

        let unaffected = row.version == entry.version;
        if !unaffected {
            if TaskStatus::from_i16(row.status) == Some(to_status) {
                outcome.record_succeeded(row.id);
            } else {
                outcome.record_failed(row.id);
                failed.push(row.id);
            }
        } else {
            let current = TaskStatus::from_i16(row.status).unwrap_or(TaskStatus::Pending);
            if policy
                .validate(current, to_status, row.due_time_utc, now)
                .is_err()
            {
                outcome.record_invalid(row.id);
            } else {
                outcome.record_failed(row.id);
                failed.push(row.id);
            }
        }
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use chrono::Duration as ChronoDuration;

    fn policy() -> TransitionPolicy {
        TransitionPolicy::new(&RulesConfig::default())
    }

    fn snapshot_entry(id: i32, version: i64) -> TaskVersionSnapshot {
        TaskVersionSnapshot { id, version }
    }

    fn row(id: i32, status: TaskStatus, due_offset_days: i64, version: i64) -> TaskRowState {
        TaskRowState {
            id,
            status: status.as_i16(),
            due_time_utc: Utc::now() + ChronoDuration::days(due_offset_days),
            version,
        }
    }

    #[test]
    fn touched_row_on_target_status_succeeds() {
        let outcome = BulkOutcome::new();
        let failed = classify_round(
            &[snapshot_entry(1, 0)],
            &[row(1, TaskStatus::Completed, 0, 1)],
            TaskStatus::Completed,
            &policy(),
            Utc::now(),
            &outcome,
        );

        assert!(failed.is_empty());
        assert_eq!(outcome.snapshot().succeeded, vec![1]);
    }

    #[test]
    fn touched_row_off_target_status_is_a_failure() {
        // Another writer bumped the version but the row is not on the target
        // status: a race, not a success.
        let outcome = BulkOutcome::new();
        let failed = classify_round(
            &[snapshot_entry(1, 0)],
            &[row(1, TaskStatus::Pending, 0, 2)],
            TaskStatus::Completed,
            &policy(),
            Utc::now(),
            &outcome,
        );

        assert_eq!(failed, vec![1]);
        assert_eq!(outcome.snapshot().failed, vec![1]);
    }

    #[test]
    fn unaffected_row_rejected_by_policy_is_invalid() {
        let outcome = BulkOutcome::new();
        let failed = classify_round(
            &[snapshot_entry(1, 0)],
            &[row(1, TaskStatus::InProgress, 10, 0)],
            TaskStatus::Completed,
            &policy(),
            Utc::now(),
            &outcome,
        );

        assert!(failed.is_empty());
        assert_eq!(outcome.snapshot().invalid, vec![1]);
    }

    #[test]
    fn unaffected_row_passing_policy_is_a_failure() {
        // The policy would have allowed the write, so only a token mismatch
        // can explain the row being untouched.
        let outcome = BulkOutcome::new();
        let failed = classify_round(
            &[snapshot_entry(1, 0)],
            &[row(1, TaskStatus::InProgress, 1, 0)],
            TaskStatus::Completed,
            &policy(),
            Utc::now(),
            &outcome,
        );

        assert_eq!(failed, vec![1]);
        assert_eq!(outcome.snapshot().failed, vec![1]);
    }

    #[test]
    fn row_deleted_between_snapshot_and_refetch_is_not_found() {
        let outcome = BulkOutcome::new();
        let failed = classify_round(
            &[snapshot_entry(1, 0)],
            &[],
            TaskStatus::Completed,
            &policy(),
            Utc::now(),
            &outcome,
        );

        assert!(failed.is_empty());
        assert_eq!(outcome.snapshot().not_found, vec![1]);
    }
}
