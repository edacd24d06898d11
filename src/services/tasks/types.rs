//! Request and response shapes for the task endpoints

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::core::tasks::types::{Task, TaskStatus};

const TITLE_MAX_LEN: usize = 200;
const DESCRIPTION_MAX_LEN: usize = 5000;

/// Payload for creating a task
///
/// The due time is accepted with its client offset; storage keeps the UTC
/// instant plus the offset minutes for display reconstruction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title
    pub title: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Due time with timezone offset (RFC 3339)
    pub due_time: DateTime<FixedOffset>,
}

impl CreateTaskRequest {
    /// Validate the payload against `now`
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(format!("title must not exceed {} characters", TITLE_MAX_LEN));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(format!(
                    "description must not exceed {} characters",
                    DESCRIPTION_MAX_LEN
                ));
            }
        }
        if self.due_time.with_timezone(&Utc) <= now {
            return Err("due time must be in the future".to_string());
        }
        Ok(())
    }
}

/// Payload for a single-record status update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status
    pub status: TaskStatus,
}

/// Payload for a bulk status update
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateStatusRequest {
    /// Ids of the tasks to update; duplicates are collapsed
    pub ids: Vec<i32>,
    /// Target status applied to every eligible record
    pub status: TaskStatus,
}

impl BulkUpdateStatusRequest {
    /// Validate the payload
    pub fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("ids must contain at least one task id".to_string());
        }
        Ok(())
    }
}

/// Paginated task listing
#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    /// Total number of tasks in the store
    pub total_count: u64,
    /// Number of tasks in this page
    pub count: usize,
    /// Page of tasks, ordered by computed priority
    pub items: Vec<Task>,
}
