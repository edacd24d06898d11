//! Task domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has not been started
    Pending,
    /// Task is being worked on
    InProgress,
    /// Task is done
    Completed,
}

impl TaskStatus {
    /// Stored smallint representation
    pub fn as_i16(self) -> i16 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    /// Decode the stored smallint representation
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(TaskStatus::Pending),
            1 => Some(TaskStatus::InProgress),
            2 => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        };
        write!(f, "{}", name)
    }
}

/// Priority tier of a task, derived from its due time
///
/// Never set directly; recomputed from the due time on every read and on
/// every status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Due within the urgent window
    Urgent,
    /// Due within the normal window
    Normal,
    /// Due later than the normal window
    Low,
}

impl TaskPriority {
    /// Stored smallint representation
    pub fn as_i16(self) -> i16 {
        match self {
            TaskPriority::Urgent => 0,
            TaskPriority::Normal => 1,
            TaskPriority::Low => 2,
        }
    }

    /// Decode the stored smallint representation
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(TaskPriority::Urgent),
            1 => Some(TaskPriority::Normal),
            2 => Some(TaskPriority::Low),
            _ => None,
        }
    }
}

/// Fields required to insert a new task record
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Task title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Due time, normalized to UTC
    pub due_time_utc: DateTime<Utc>,
    /// Timezone offset of the creating client, in minutes
    pub tz_offset_minutes: i32,
}

/// A task record as exposed by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier
    pub id: i32,
    /// Task title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Due time, stored in UTC
    pub due_time_utc: DateTime<Utc>,
    /// Timezone offset of the creating client, for display reconstruction
    pub tz_offset_minutes: i32,
    /// Current completion status
    pub status: TaskStatus,
    /// Derived priority tier
    pub priority: TaskPriority,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency token; bumped on every successful mutation
    pub version: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_repr() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            assert_eq!(TaskStatus::from_i16(status.as_i16()), Some(status));
        }
        assert_eq!(TaskStatus::from_i16(7), None);
    }

    #[test]
    fn priority_ordering_matches_storage_repr() {
        // The listing endpoint orders by the stored value ascending.
        assert!(TaskPriority::Urgent.as_i16() < TaskPriority::Normal.as_i16());
        assert!(TaskPriority::Normal.as_i16() < TaskPriority::Low.as_i16());
    }
}
