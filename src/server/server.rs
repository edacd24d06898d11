//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::routes;
use crate::server::state::AppState;
use crate::services::TaskService;
use crate::storage::TaskDatabase;
use crate::utils::error::Result;
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer as ActixHttpServer};
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server: connect the store, run migrations, wire the service
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let db = TaskDatabase::new(&config.database).await?;
        db.migrate().await?;

        let tasks = TaskService::new(config, db);
        let state = AppState::new(config.clone(), tasks);

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let state = web::Data::new(self.state);
        let cors_config = self.config.cors.clone();

        let mut server = ActixHttpServer::new(move || {
            let cors = if cors_config.enabled {
                if cors_config.allows_all_origins() {
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                } else {
                    let mut cors = Cors::default().allow_any_method().allow_any_header();
                    for origin in &cors_config.allowed_origins {
                        cors = cors.allowed_origin(origin);
                    }
                    cors
                }
            } else {
                Cors::default()
            };

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .wrap(Logger::default())
                .configure(routes::health::configure_routes)
                .configure(routes::tasks::configure_routes)
        });

        if self.config.workers > 0 {
            server = server.workers(self.config.workers);
        }

        let server = server.bind((self.config.host.as_str(), self.config.port))?;
        info!(
            "Server listening on http://{}:{}",
            self.config.host, self.config.port
        );

        server.run().await?;
        Ok(())
    }
}
