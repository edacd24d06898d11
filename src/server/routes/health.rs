//! Health check endpoint

use actix_web::{web, HttpResponse};
use std::borrow::Cow;
use tracing::debug;

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Basic health check endpoint
///
/// Reports degraded instead of failing outright when the store does not
/// respond, so load balancers can tell the difference.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let database_ok = state.tasks.database_healthy().await;

    let health_status = HealthStatus {
        status: if database_ok {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        database: database_ok,
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };

    HttpResponse::Ok().json(ApiResponse::success(health_status))
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    database: bool,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
}
