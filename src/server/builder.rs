//! Server startup with automatic configuration loading

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use tracing::info;

/// Run the server with automatic configuration loading
pub async fn run_server() -> Result<()> {
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("TASKFLOW_CONFIG").unwrap_or_else(|_| "config/taskflow.yaml".to_string());
    info!("Loading configuration file: {}", config_path);

    let config = match Config::from_file(&config_path).await {
        Ok(config) => {
            info!("Configuration file loaded successfully");
            config
        }
        Err(e) => {
            info!(
                "Configuration file loading failed ({}), falling back to defaults + environment",
                e
            );
            Config::from_env()?
        }
    };

    let server = HttpServer::new(&config).await?;
    info!(
        "Starting at http://{}:{}",
        config.server.host, config.server.port
    );
    info!("API Endpoints:");
    info!("   GET    /health          - Health check");
    info!("   POST   /api/tasks       - Create task");
    info!("   GET    /api/tasks       - List tasks by priority");
    info!("   GET    /api/tasks/{{id}}  - Fetch one task");
    info!("   PUT    /api/tasks/{{id}}  - Update task status");
    info!("   PUT    /api/tasks       - Bulk status update");
    info!("   DELETE /api/tasks/{{id}}  - Delete task");

    server.start().await
}
