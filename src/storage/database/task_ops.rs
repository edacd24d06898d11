//! Task store operations
//!
//! Single-record CRUD runs on the pooled connection via [`TaskDatabase`];
//! the bulk primitives (version snapshot, conditional write, row-state
//! re-fetch) are generic over [`ConnectionTrait`] so they run inside the
//! shared bulk-update transaction.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use super::connection::TaskDatabase;
use super::entities::{task, TaskEntity};
use crate::core::tasks::policy::TransitionPolicy;
use crate::core::tasks::priority::PriorityClassifier;
use crate::core::tasks::types::{NewTask, Task, TaskPriority, TaskStatus};
use crate::utils::error::{Result, ServiceError};

/// `(id, version)` pair captured before a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct TaskVersionSnapshot {
    /// Task identifier
    pub id: i32,
    /// Version token at snapshot time
    pub version: i64,
}

/// Row state read back after a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct TaskRowState {
    /// Task identifier
    pub id: i32,
    /// Stored status
    pub status: i16,
    /// Due time in UTC
    pub due_time_utc: DateTime<Utc>,
    /// Version token after the write attempt
    pub version: i64,
}

impl TaskDatabase {
    /// Insert a new task with status Pending and the given derived priority
    pub async fn create_task(
        &self,
        new_task: NewTask,
        priority: TaskPriority,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        debug!("Creating task: {}", new_task.title);

        let active_model = task::ActiveModel {
            title: Set(new_task.title),
            description: Set(new_task.description),
            due_time_utc: Set(new_task.due_time_utc),
            tz_offset_minutes: Set(new_task.tz_offset_minutes),
            status: Set(TaskStatus::Pending.as_i16()),
            priority: Set(priority.as_i16()),
            created_at: Set(now),
            version: Set(0),
            ..Default::default()
        };

        let model = active_model
            .insert(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        Ok(model.to_domain_task())
    }

    /// Find a task by id
    pub async fn find_task(&self, id: i32) -> Result<Option<Task>> {
        let model = TaskEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        Ok(model.map(|m| m.to_domain_task()))
    }

    /// Delete a task by id, returning whether a row was removed
    pub async fn delete_task(&self, id: i32) -> Result<bool> {
        debug!("Deleting task: {}", id);

        let result = TaskEntity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        Ok(result.rows_affected > 0)
    }

    /// List tasks ordered by the given store-side expression, with the total count
    pub async fn list_tasks(
        &self,
        offset: u64,
        limit: u64,
        order: SimpleExpr,
    ) -> Result<(u64, Vec<Task>)> {
        let total = TaskEntity::find()
            .count(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        let models = TaskEntity::find()
            .order_by(order, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        Ok((total, models.iter().map(|m| m.to_domain_task()).collect()))
    }

    /// Single-record guarded status update
    ///
    /// Applies only if the version token still matches `expected_version`;
    /// returns the number of affected rows (0 means a concurrent writer won).
    pub async fn update_status_guarded(
        &self,
        id: i32,
        expected_version: i64,
        to_status: TaskStatus,
        priority: TaskPriority,
    ) -> Result<u64> {
        let result = TaskEntity::update_many()
            .col_expr(task::Column::Status, Expr::value(to_status.as_i16()))
            .col_expr(task::Column::Priority, Expr::value(priority.as_i16()))
            .col_expr(
                task::Column::Version,
                Expr::col(task::Column::Version).add(1),
            )
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Version.eq(expected_version))
            .exec(self.connection())
            .await
            .map_err(ServiceError::Database)?;

        Ok(result.rows_affected)
    }
}

/// Fetch the `(id, version)` snapshot for every requested id that exists
pub async fn fetch_version_snapshot<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<TaskVersionSnapshot>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    TaskEntity::find()
        .select_only()
        .column(task::Column::Id)
        .column(task::Column::Version)
        .filter(task::Column::Id.is_in(ids.iter().copied()))
        .into_model::<TaskVersionSnapshot>()
        .all(conn)
        .await
        .map_err(ServiceError::Database)
}

/// Read back `(id, status, due_time_utc, version)` for the given ids
pub async fn fetch_row_states<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<TaskRowState>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    TaskEntity::find()
        .select_only()
        .column(task::Column::Id)
        .column(task::Column::Status)
        .column(task::Column::DueTimeUtc)
        .column(task::Column::Version)
        .filter(task::Column::Id.is_in(ids.iter().copied()))
        .into_model::<TaskRowState>()
        .all(conn)
        .await
        .map_err(ServiceError::Database)
}

/// One conditional bulk write
///
/// For every row whose `(id, version)` still matches the snapshot AND that
/// passes the transition-policy filter, sets the target status, recomputes
/// the priority store-side, and bumps the version token. Rows failing either
/// check are left untouched.
pub async fn conditional_status_update<C: ConnectionTrait>(
    conn: &C,
    snapshot: &[TaskVersionSnapshot],
    to_status: TaskStatus,
    policy: &TransitionPolicy,
    classifier: &PriorityClassifier,
    now: DateTime<Utc>,
) -> Result<u64> {
    if snapshot.is_empty() {
        return Ok(0);
    }

    let mut token_match = Condition::any();
    for entry in snapshot {
        token_match = token_match.add(
            Condition::all()
                .add(task::Column::Id.eq(entry.id))
                .add(task::Column::Version.eq(entry.version)),
        );
    }

    let result = TaskEntity::update_many()
        .col_expr(task::Column::Status, Expr::value(to_status.as_i16()))
        .col_expr(task::Column::Priority, classifier.store_expr(now))
        .col_expr(
            task::Column::Version,
            Expr::col(task::Column::Version).add(1),
        )
        .filter(token_match)
        .filter(policy.store_filter(to_status, now))
        .exec(conn)
        .await
        .map_err(ServiceError::Database)?;

    Ok(result.rows_affected)
}
