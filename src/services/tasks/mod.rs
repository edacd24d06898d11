//! Task application service

pub mod service;
pub mod types;


pub use service::TaskService;
pub use types::{
    BulkUpdateStatusRequest, CreateTaskRequest, TaskListResponse, UpdateStatusRequest,
};
