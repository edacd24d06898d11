//! Task read cache
//!
//! TTL-bounded cache-aside store keyed by task id. The bulk-update engine
//! never touches this; the service invalidates succeeded ids after the
//! transaction commits.

use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheConfig;
use crate::core::tasks::types::Task;

/// Cache of task records keyed by id
#[derive(Clone)]
pub struct TaskCache {
    cache: Cache<i32, Task>,
}

impl TaskCache {
    /// Create a cache from the configured TTL and capacity
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();
        Self { cache }
    }

    /// Look up a cached task
    pub async fn get(&self, id: i32) -> Option<Task> {
        self.cache.get(&id).await
    }

    /// Store a task
    pub async fn set(&self, task: Task) {
        self.cache.insert(task.id, task).await;
    }

    /// Drop a single entry
    pub async fn remove(&self, id: i32) {
        self.cache.invalidate(&id).await;
    }

    /// Drop every entry in the given id set
    pub async fn remove_all(&self, ids: &[i32]) {
        debug!("Invalidating {} cached tasks", ids.len());
        for id in ids {
            self.cache.invalidate(id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tasks::types::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn sample_task(id: i32) -> Task {
        Task {
            id,
            title: format!("task-{}", id),
            description: None,
            due_time_utc: Utc::now(),
            tz_offset_minutes: 0,
            status: TaskStatus::Pending,
            priority: TaskPriority::Normal,
            created_at: Utc::now(),
            version: 0,
        }
    }

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let cache = TaskCache::new(&CacheConfig::default());

        assert!(cache.get(1).await.is_none());

        cache.set(sample_task(1)).await;
        assert_eq!(cache.get(1).await.map(|t| t.id), Some(1));

        cache.remove(1).await;
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn remove_all_clears_every_listed_id() {
        let cache = TaskCache::new(&CacheConfig::default());
        for id in 1..=3 {
            cache.set(sample_task(id)).await;
        }

        cache.remove_all(&[1, 3]).await;

        assert!(cache.get(1).await.is_none());
        assert!(cache.get(2).await.is_some());
        assert!(cache.get(3).await.is_none());
    }
}
