//! Task service
//!
//! Single-record paths are thin cache-aside wrappers around the store; the
//! bulk path hands the id set to the batch runner, which drives the bulk
//! update engine inside one transaction. Cache entries for succeeded ids are
//! invalidated only after that transaction commits.

use chrono::Utc;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::bulk::{BatchRunner, BulkOutcome, BulkUpdateEngine, BulkUpdateReport};
use crate::core::tasks::policy::TransitionPolicy;
use crate::core::tasks::priority::PriorityClassifier;
use crate::core::tasks::types::{NewTask, Task};
use crate::storage::{TaskCache, TaskDatabase};
use crate::utils::error::{Result, ServiceError};

use super::types::{
    BulkUpdateStatusRequest, CreateTaskRequest, TaskListResponse, UpdateStatusRequest,
};

/// Application service for task records
#[derive(Clone)]
pub struct TaskService {
    db: TaskDatabase,
    cache: TaskCache,
    policy: Arc<TransitionPolicy>,
    classifier: Arc<PriorityClassifier>,
    engine: BulkUpdateEngine,
    runner: BatchRunner,
}

impl TaskService {
    /// Wire the service from configuration and a connected database
    pub fn new(config: &Config, db: TaskDatabase) -> Self {
        let policy = Arc::new(TransitionPolicy::new(&config.rules));
        let classifier = Arc::new(PriorityClassifier::new(&config.rules));
        let engine = BulkUpdateEngine::new(
            Arc::clone(&policy),
            Arc::clone(&classifier),
            &config.processing,
        );

        Self {
            db,
            cache: TaskCache::new(&config.cache),
            policy,
            classifier,
            engine,
            runner: BatchRunner::new(&config.processing),
        }
    }

    /// Create a task with status Pending and a priority derived from its due time
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task> {
        let now = Utc::now();
        request.validate(now).map_err(ServiceError::Validation)?;

        let due_time_utc = request.due_time.with_timezone(&Utc);
        let tz_offset_minutes = request.due_time.offset().local_minus_utc() / 60;
        let priority = self.classifier.classify(due_time_utc, now);

        let task = self
            .db
            .create_task(
                NewTask {
                    title: request.title,
                    description: request.description,
                    due_time_utc,
                    tz_offset_minutes,
                },
                priority,
                now,
            )
            .await?;

        info!("Created task {}", task.id);
        Ok(task)
    }

    /// Fetch one task, cache-aside
    pub async fn get_task(&self, id: i32) -> Result<Task> {
        if let Some(task) = self.cache.get(id).await {
            debug!("Cache hit for task {}", id);
            return Ok(task);
        }

        let mut task = self
            .db
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Task with ID {} was not found", id)))?;

        // Priority is display-derived on reads, never trusted from storage.
        task.priority = self.classifier.classify(task.due_time_utc, Utc::now());
        self.cache.set(task.clone()).await;

        Ok(task)
    }

    /// Paginated listing ordered by computed priority
    pub async fn list_tasks(&self, page: u64, page_size: u64) -> Result<TaskListResponse> {
        let now = Utc::now();
        let offset = page.saturating_sub(1) * page_size;
        let (total_count, mut tasks) = self
            .db
            .list_tasks(offset, page_size, self.classifier.store_expr(now))
            .await?;

        for task in &mut tasks {
            task.priority = self.classifier.classify(task.due_time_utc, now);
        }

        Ok(TaskListResponse {
            total_count,
            count: tasks.len(),
            items: tasks,
        })
    }

    /// Single-record status update, policy-checked and optimistic
    pub async fn update_task_status(&self, id: i32, request: UpdateStatusRequest) -> Result<Task> {
        let task = self
            .db
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Task with ID {} was not found", id)))?;

        let now = Utc::now();
        self.policy
            .validate(task.status, request.status, task.due_time_utc, now)
            .map_err(|violation| ServiceError::Validation(violation.to_string()))?;

        let priority = self.classifier.classify(task.due_time_utc, now);
        let affected = self
            .db
            .update_status_guarded(id, task.version, request.status, priority)
            .await?;

        if affected == 0 {
            return Err(ServiceError::Conflict(format!(
                "Task '{}' was modified concurrently. No changes took place.",
                id
            )));
        }

        let mut updated = self
            .db
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Task with ID {} was not found", id)))?;
        updated.priority = self.classifier.classify(updated.due_time_utc, now);

        // Re-prime rather than leave a stale entry behind.
        self.cache.remove(id).await;
        self.cache.set(updated.clone()).await;

        Ok(updated)
    }

    /// Delete a task and drop its cache entry
    pub async fn delete_task(&self, id: i32) -> Result<()> {
        let removed = self.db.delete_task(id).await?;
        if !removed {
            return Err(ServiceError::NotFound(format!(
                "Task with ID {} was not found",
                id
            )));
        }

        self.cache.remove(id).await;
        Ok(())
    }

    /// Whether the underlying store answers a ping
    pub async fn database_healthy(&self) -> bool {
        self.db.health_check().await.is_ok()
    }

    /// Bulk status update over a set of task ids
    ///
    /// Returns a complete four-way partition of the requested ids even when
    /// some rows permanently failed; only a store-fatal abort (with full
    /// rollback) withholds the accounting.
    pub async fn bulk_update_status(
        &self,
        request: BulkUpdateStatusRequest,
    ) -> Result<BulkUpdateReport> {
        request.validate().map_err(ServiceError::Validation)?;

        let mut ids = request.ids;
        ids.sort_unstable();
        ids.dedup();
        let total_count = ids.len();
        let to_status = request.status;

        info!(
            requested = total_count,
            status = %to_status,
            "Starting bulk status update"
        );

        let outcome = Arc::new(BulkOutcome::new());
        {
            let engine = self.engine.clone();
            let outcome = Arc::clone(&outcome);
            self.runner
                .run(self.db.connection(), ids, move |txn, chunk| {
                    let engine = engine.clone();
                    let outcome = Arc::clone(&outcome);
                    async move { engine.process(txn, &outcome, chunk, to_status).await }.boxed()
                })
                .await?;
        }

        let snapshot = outcome.snapshot();
        self.cache.remove_all(&snapshot.succeeded).await;

        let report = BulkUpdateReport::from_outcome(total_count, snapshot);
        info!(
            succeeded = report.succeeded_count,
            not_found = report.not_found_count,
            invalid = report.invalid_count,
            failed = report.failed_count,
            "Bulk status update finished"
        );

        Ok(report)
    }
}
