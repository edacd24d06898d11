//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::services::TaskService;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across threads.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Task application service
    pub tasks: Arc<TaskService>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, tasks: TaskService) -> Self {
        Self {
            config: Arc::new(config),
            tasks: Arc::new(tasks),
        }
    }
}
