//! Task endpoints

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::tasks::types::{
    BulkUpdateStatusRequest, CreateTaskRequest, UpdateStatusRequest,
};
use crate::utils::error::ServiceError;

/// Configure task routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .route("", web::post().to(create_task))
            .route("", web::get().to(list_tasks))
            .route("", web::put().to(bulk_update_status))
            .route("/{id}", web::get().to(get_task))
            .route("/{id}", web::put().to(update_task_status))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

/// Query parameters for the task listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListTasksQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    100
}

impl ListTasksQuery {
    /// Validate pagination parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be greater than 0".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }
        if self.page_size > 1000 {
            return Err("page_size cannot exceed 1000".to_string());
        }
        Ok(())
    }
}

async fn create_task(
    state: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let task = state.tasks.create_task(payload.into_inner()).await?;
    info!("Created task {} via API", task.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(task)))
}

async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let task = state.tasks.get_task(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<ListTasksQuery>,
) -> Result<HttpResponse, ServiceError> {
    query.validate().map_err(ServiceError::Validation)?;
    let page = state.tasks.list_tasks(query.page, query.page_size).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page)))
}

async fn update_task_status(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let task = state
        .tasks
        .update_task_status(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

async fn bulk_update_status(
    state: web::Data<AppState>,
    payload: web::Json<BulkUpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let report = state.tasks.bulk_update_status(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    state.tasks.delete_task(id).await?;
    info!("Deleted task {} via API", id);
    Ok(HttpResponse::NoContent().finish())
}
