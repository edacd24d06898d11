use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::tasks::types::{Task, TaskPriority, TaskStatus};

/// Task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Task ID (store-assigned)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Task title
    pub title: String,

    /// Task description (optional)
    pub description: Option<String>,

    /// Due time in UTC
    pub due_time_utc: DateTimeUtc,

    /// Timezone offset of the creating client, in minutes
    pub tz_offset_minutes: i32,

    /// Completion status (0=Pending, 1=InProgress, 2=Completed)
    pub status: i16,

    /// Derived priority tier (0=Urgent, 1=Normal, 2=Low)
    pub priority: i16,

    /// Creation timestamp
    pub created_at: DateTimeUtc,

    /// Optimistic-concurrency token, bumped on every successful mutation
    pub version: i64,
}

/// Task entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert SeaORM model to the domain task model
    ///
    /// The stored priority is a by-product of the last write; callers that
    /// surface tasks to clients recompute it from the due time.
    pub fn to_domain_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_time_utc: self.due_time_utc,
            tz_offset_minutes: self.tz_offset_minutes,
            status: TaskStatus::from_i16(self.status).unwrap_or(TaskStatus::Pending),
            priority: TaskPriority::from_i16(self.priority).unwrap_or(TaskPriority::Low),
            created_at: self.created_at,
            version: self.version,
        }
    }
}
