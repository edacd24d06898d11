//! Status transition policy
//!
//! One canonical transition table drives both the in-memory evaluator and
//! the store-side filter used inside conditional bulk updates, so the two
//! representations cannot drift apart.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Condition;
use sea_orm::ColumnTrait;
use thiserror::Error;

use crate::config::RulesConfig;
use crate::core::tasks::types::TaskStatus;
use crate::storage::database::entities::task;

/// Legal `(from, to)` status transitions. Everything else is rejected,
/// including identity transitions and any transition out of Completed.
pub const LEGAL_TRANSITIONS: &[(TaskStatus, TaskStatus)] = &[
    (TaskStatus::Pending, TaskStatus::InProgress),
    (TaskStatus::Pending, TaskStatus::Completed),
    (TaskStatus::InProgress, TaskStatus::Pending),
    (TaskStatus::InProgress, TaskStatus::Completed),
];

/// Business-rule rejection of a status change
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The `(from, to)` pair is not in the transition table
    #[error("task status cannot be changed from '{from}' to '{to}'")]
    IllegalTransition {
        /// Current status
        from: TaskStatus,
        /// Requested status
        to: TaskStatus,
    },

    /// Completion requested too far ahead of the due time
    #[error("cannot mark a task as completed more than {limit_days} days before it is due")]
    EarlyCompletion {
        /// Configured early-completion window in days
        limit_days: i64,
    },
}

/// Decides whether a status transition is allowed
#[derive(Debug, Clone)]
pub struct TransitionPolicy {
    early_completion_days_limit: i64,
}

impl TransitionPolicy {
    /// Create a policy from the configured rule thresholds
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            early_completion_days_limit: rules.early_completion_days_limit,
        }
    }

    /// Validate a transition for a record due at `due_time_utc`, evaluated at `now`
    pub fn validate(
        &self,
        from: TaskStatus,
        to: TaskStatus,
        due_time_utc: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyViolation> {
        if !LEGAL_TRANSITIONS.contains(&(from, to)) {
            return Err(PolicyViolation::IllegalTransition { from, to });
        }
        if to == TaskStatus::Completed
            && due_time_utc > now + Duration::days(self.early_completion_days_limit)
        {
            return Err(PolicyViolation::EarlyCompletion {
                limit_days: self.early_completion_days_limit,
            });
        }
        Ok(())
    }

    /// Statuses a record may currently have for a transition into `to` to be legal
    pub fn allowed_from(to: TaskStatus) -> impl Iterator<Item = TaskStatus> {
        LEGAL_TRANSITIONS
            .iter()
            .filter(move |(_, t)| *t == to)
            .map(|(f, _)| *f)
    }

    /// The same two rules as a store-side filter for conditional updates
    ///
    /// Rows not matching this condition are left untouched by the bulk write
    /// and later classified as policy-invalid. Must agree with [`validate`]
    /// on every input; the agreement test fuzzes both sides.
    ///
    /// [`validate`]: TransitionPolicy::validate
    pub fn store_filter(&self, to: TaskStatus, now: DateTime<Utc>) -> Condition {
        let allowed: Vec<i16> = Self::allowed_from(to).map(TaskStatus::as_i16).collect();
        let mut condition = Condition::all().add(task::Column::Status.is_in(allowed));

        if to == TaskStatus::Completed {
            let limit = now + Duration::days(self.early_completion_days_limit);
            condition = condition.add(task::Column::DueTimeUtc.lte(limit));
        }

        condition
    }
}
